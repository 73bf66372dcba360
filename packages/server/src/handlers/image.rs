use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/image/{name}",
    tag = "Images",
    operation_id = "getImage",
    summary = "Download a stored image",
    description = "Streams a stored image by its generated name. The content type is \
        guessed from the file extension.",
    params(("name" = String, Path, description = "Stored image name, as returned in `filename`")),
    responses(
        (status = 200, description = "Image content"),
        (status = 404, description = "Image not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn serve_image(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, AppError> {
    let (reader, size) = state.images.open(&name).await?;

    let content_type = mime_guess::from_path(&name).first_or_octet_stream();
    let body = Body::from_stream(ReaderStream::new(reader));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type.to_string())
        .header(header::CONTENT_LENGTH, size.to_string())
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}
