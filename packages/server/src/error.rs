use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::storage::StorageError;
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};

use crate::photo::RecordError;

/// Error response returned by all endpoints on failure.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Human-readable error description.
    #[schema(example = "Photo not found")]
    pub error: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    /// Malformed input: bad id, missing or oversized upload, broken form.
    Validation(String),
    NotFound(String),
    /// Store or filesystem failure. The detail is logged, never returned.
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, ErrorBody { error: msg }),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorBody { error: msg }),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<RecordError> for AppError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::NotFound(_) => AppError::NotFound("Photo not found".into()),
            RecordError::Database(e) => e.into(),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(_) | StorageError::InvalidName(_) => {
                AppError::NotFound("Image not found".into())
            }
            StorageError::SizeLimitExceeded { limit, .. } => {
                AppError::Validation(format!("File exceeds maximum size of {limit} bytes"))
            }
            StorageError::Io(e) => AppError::Internal(format!("Image storage failed: {e}")),
        }
    }
}
