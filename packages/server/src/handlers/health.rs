use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::ErrorBody;
use crate::state::AppState;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: &'static str,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    operation_id = "healthcheck",
    summary = "Service health",
    responses(
        (status = 200, description = "Service is healthy (database reachable)", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = ErrorBody),
    ),
)]
pub async fn healthcheck(State(state): State<AppState>) -> Response {
    match state.db.ping().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse { status: "ok" })).into_response(),
        Err(e) => {
            tracing::warn!("Database ping failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorBody {
                    error: "Database unreachable".into(),
                }),
            )
                .into_response()
        }
    }
}
