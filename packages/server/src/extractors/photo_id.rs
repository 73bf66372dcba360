use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::AppError;

const INVALID_PHOTO_ID: &str = "Invalid photo ID";

/// The `{id}` path segment of a photo route, parsed as a positive integer.
///
/// Anything else (non-numeric, zero, negative, out of range) is rejected with
/// `AppError::Validation("Invalid photo ID")` so clients always receive a JSON
/// error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoId(pub i32);

impl<S> FromRequestParts<S> for PhotoId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::Validation(INVALID_PHOTO_ID.into()))?;
        parse_photo_id(&raw).map(PhotoId)
    }
}

pub fn parse_photo_id(raw: &str) -> Result<i32, AppError> {
    raw.parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::Validation(INVALID_PHOTO_ID.into()))
}
