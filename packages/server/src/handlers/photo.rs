use axum::Json;
use axum::extract::multipart::Field;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::storage::ImageStore;
use futures::TryStreamExt;
use tokio_util::io::StreamReader;
use tracing::{info, instrument, warn};

use crate::entity::photo;
use crate::error::{AppError, ErrorBody};
use crate::extractors::{AppMultipart, PhotoId};
use crate::models::photo::{DeleteResponse, PhotoResponse};
use crate::photo::{NewPhoto, photo_service};
use crate::state::AppState;

/// Headroom above the image size limit for text fields and part boundaries.
const FORM_OVERHEAD: usize = 1024 * 1024;

pub fn upload_body_limit(max_upload_size: u64) -> DefaultBodyLimit {
    let max_upload_size = usize::try_from(max_upload_size).unwrap_or(usize::MAX);
    DefaultBodyLimit::max(max_upload_size.saturating_add(FORM_OVERHEAD))
}

#[utoipa::path(
    get,
    path = "/photos",
    tag = "Photos",
    operation_id = "listPhotos",
    summary = "List all photos",
    description = "Returns every stored photo. An empty table yields `[]`. \
        List items omit the derived `file` URL.",
    responses(
        (status = 200, description = "All photos", body = Vec<PhotoResponse>),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
)]
#[instrument(skip_all)]
pub async fn list_photos(
    State(state): State<AppState>,
) -> Result<Json<Vec<PhotoResponse>>, AppError> {
    let photos = photo_service(&state.db).list().await?;
    Ok(Json(photos.into_iter().map(PhotoResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/photo/{id}",
    tag = "Photos",
    operation_id = "getPhoto",
    summary = "Get a photo by ID",
    description = "Returns a single photo including the public `file` URL of its image.",
    params(("id" = i32, Path, description = "Photo ID")),
    responses(
        (status = 200, description = "Photo details", body = PhotoResponse),
        (status = 400, description = "Invalid photo ID", body = ErrorBody),
        (status = 404, description = "Photo not found", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
)]
#[instrument(skip_all, fields(id = id))]
pub async fn get_photo(
    State(state): State<AppState>,
    PhotoId(id): PhotoId,
) -> Result<Json<PhotoResponse>, AppError> {
    let model = photo_service(&state.db).read(id).await?;
    Ok(Json(PhotoResponse::with_file(
        model,
        &state.config.server.public_url,
    )))
}

#[utoipa::path(
    post,
    path = "/photo",
    tag = "Photos",
    operation_id = "createPhoto",
    summary = "Upload a new photo",
    description = "Stores the uploaded image under a generated name and inserts the photo row. \
        The `file` multipart field is required; `title`, `description` and `ori_link` \
        default to empty strings.",
    request_body(content_type = "multipart/form-data", description = "Image file plus title, description and ori_link fields"),
    responses(
        (status = 201, description = "Photo created", body = PhotoResponse),
        (status = 400, description = "Missing file or malformed form", body = ErrorBody),
        (status = 500, description = "File or store failure", body = ErrorBody),
    ),
)]
#[instrument(skip_all)]
pub async fn create_photo(
    State(state): State<AppState>,
    AppMultipart(multipart): AppMultipart,
) -> Result<impl IntoResponse, AppError> {
    let images = &*state.images;
    let (form, filename) = read_photo_form(multipart, images).await?;

    let created = photo_service(&state.db)
        .create(form.into_new_photo(filename.clone()))
        .await;
    let model = match created {
        Ok(model) => model,
        Err(e) => {
            discard_image(images, &filename).await;
            return Err(e.into());
        }
    };

    info!(id = model.id, filename = %model.filename, "Created photo");

    Ok((
        StatusCode::CREATED,
        Json(PhotoResponse::with_file(
            model,
            &state.config.server.public_url,
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/photo/{id}",
    tag = "Photos",
    operation_id = "updatePhoto",
    summary = "Replace a photo",
    description = "Replaces the image and every field of an existing photo; the id is kept. \
        The previous image is removed once the row points at the new one. If that removal \
        fails the new image and fields stay written, and the request reports 500.",
    params(("id" = i32, Path, description = "Photo ID")),
    request_body(content_type = "multipart/form-data", description = "Image file plus title, description and ori_link fields"),
    responses(
        (status = 200, description = "Photo updated", body = PhotoResponse),
        (status = 400, description = "Invalid photo ID, missing file or malformed form", body = ErrorBody),
        (status = 404, description = "Photo not found", body = ErrorBody),
        (status = 500, description = "File or store failure", body = ErrorBody),
    ),
)]
#[instrument(skip_all, fields(id = id))]
pub async fn update_photo(
    State(state): State<AppState>,
    PhotoId(id): PhotoId,
    AppMultipart(multipart): AppMultipart,
) -> Result<Json<PhotoResponse>, AppError> {
    let images = &*state.images;
    let service = photo_service(&state.db);

    let (form, filename) = read_photo_form(multipart, images).await?;

    let existing = match service.read(id).await {
        Ok(existing) => existing,
        Err(e) => {
            discard_image(images, &filename).await;
            return Err(e.into());
        }
    };

    let replacement = photo::Model {
        id,
        title: form.title,
        description: form.description,
        filename: filename.clone(),
        ori_link: form.ori_link,
    };
    let model = match service.update(replacement).await {
        Ok(model) => model,
        Err(e) => {
            discard_image(images, &filename).await;
            return Err(e.into());
        }
    };

    // The row already points at the new image; a stale file only fails the response.
    remove_image(images, &existing.filename).await?;

    info!(filename = %model.filename, "Updated photo");

    Ok(Json(PhotoResponse::with_file(
        model,
        &state.config.server.public_url,
    )))
}

#[utoipa::path(
    delete,
    path = "/photo/{id}",
    tag = "Photos",
    operation_id = "deletePhoto",
    summary = "Delete a photo",
    description = "Removes the photo's image and its row. If the image cannot be removed \
        the row is still deleted, and the request reports 500.",
    params(("id" = i32, Path, description = "Photo ID")),
    responses(
        (status = 200, description = "Photo deleted", body = DeleteResponse),
        (status = 400, description = "Invalid photo ID", body = ErrorBody),
        (status = 404, description = "Photo not found", body = ErrorBody),
        (status = 500, description = "File or store failure", body = ErrorBody),
    ),
)]
#[instrument(skip_all, fields(id = id))]
pub async fn delete_photo(
    State(state): State<AppState>,
    PhotoId(id): PhotoId,
) -> Result<Json<DeleteResponse>, AppError> {
    let service = photo_service(&state.db);

    let existing = service.read(id).await?;
    let removed = remove_image(&*state.images, &existing.filename).await;
    service.delete(id).await?;
    removed?;

    info!("Deleted photo");

    Ok(Json(DeleteResponse::success()))
}

/// Text fields of a photo upload form.
#[derive(Debug, Default)]
struct PhotoForm {
    title: String,
    description: String,
    ori_link: String,
}

impl PhotoForm {
    fn into_new_photo(self, filename: String) -> NewPhoto {
        NewPhoto {
            title: self.title,
            description: self.description,
            filename,
            ori_link: self.ori_link,
        }
    }
}

/// Read a photo upload form, storing its `file` field in the image store.
///
/// Returns the text fields and the generated name of the stored image. If the
/// form turns out to be unusable after the image was stored, the image is
/// removed again.
async fn read_photo_form(
    mut multipart: Multipart,
    images: &dyn ImageStore,
) -> Result<(PhotoForm, String), AppError> {
    let mut form = PhotoForm::default();
    let mut stored: Option<String> = None;

    let outcome = read_fields(&mut multipart, images, &mut form, &mut stored).await;

    match (outcome, stored) {
        (Ok(()), Some(filename)) => Ok((form, filename)),
        (Ok(()), None) => Err(AppError::Validation("Missing 'file' field".into())),
        (Err(e), stored) => {
            if let Some(filename) = stored {
                discard_image(images, &filename).await;
            }
            Err(e)
        }
    }
}

async fn read_fields(
    multipart: &mut Multipart,
    images: &dyn ImageStore,
    form: &mut PhotoForm,
    stored: &mut Option<String>,
) -> Result<(), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("file") if stored.is_none() => {
                // Only file parts count as an upload; a plain text `file` is skipped.
                if let Some(original) = field.file_name().map(str::to_string) {
                    *stored = Some(store_field(field, images, &original).await?);
                }
            }
            Some("title") => form.title = read_text(field, "title").await?,
            Some("description") => form.description = read_text(field, "description").await?,
            Some("ori_link") => form.ori_link = read_text(field, "ori_link").await?,
            _ => {} // Ignore unknown fields and repeated files.
        }
    }
    Ok(())
}

/// Stream a multipart field straight into the image store.
async fn store_field(
    field: Field<'_>,
    images: &dyn ImageStore,
    original_filename: &str,
) -> Result<String, AppError> {
    let reader = StreamReader::new(field.map_err(std::io::Error::other));
    tokio::pin!(reader);
    Ok(images.save(&mut reader, original_filename).await?)
}

async fn read_text(field: Field<'_>, name: &str) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read {name}: {e}")))
}

/// Remove the image a photo row points at.
///
/// An image that is already gone only logs a warning.
async fn remove_image(images: &dyn ImageStore, filename: &str) -> Result<(), AppError> {
    match images.remove(filename).await {
        Ok(true) => Ok(()),
        Ok(false) => {
            warn!(filename = %filename, "Stored image was already missing");
            Ok(())
        }
        Err(e) => Err(AppError::Internal(format!(
            "Failed to remove image {filename}: {e}"
        ))),
    }
}

/// Best-effort removal of an image that never got attached to a row.
async fn discard_image(images: &dyn ImageStore, filename: &str) {
    if let Err(e) = images.remove(filename).await {
        warn!(filename = %filename, error = %e, "Failed to discard orphaned image");
    }
}
