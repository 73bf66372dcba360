use serde::{Deserialize, Serialize};

use crate::entity::photo;

/// Response DTO for a photo.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PhotoResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Sunset over the bay")]
    pub title: String,
    #[schema(example = "Taken from the pier at dusk")]
    pub description: String,
    /// Stored image name, relative to the image directory.
    #[schema(example = "upload-0f8fad5bd9cb469fa16570867728950e.jpg")]
    pub filename: String,
    /// Public URL of the stored image. Omitted from list results.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "localhost:8080/image/upload-0f8fad5bd9cb469fa16570867728950e.jpg")]
    pub file: Option<String>,
    /// External reference URL for the original picture.
    #[schema(example = "https://example.com/original.jpg")]
    pub ori_link: String,
}

impl PhotoResponse {
    /// Build a response that carries the image URL under `public_url`.
    pub fn with_file(model: photo::Model, public_url: &str) -> Self {
        let file = image_url(public_url, &model.filename);
        Self {
            file: Some(file),
            ..Self::from(model)
        }
    }
}

impl From<photo::Model> for PhotoResponse {
    fn from(model: photo::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            filename: model.filename,
            file: None,
            ori_link: model.ori_link,
        }
    }
}

/// Response body for a successful delete.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DeleteResponse {
    #[schema(example = "success")]
    pub result: &'static str,
}

impl DeleteResponse {
    pub fn success() -> Self {
        Self { result: "success" }
    }
}

/// Public URL of a stored image.
pub fn image_url(public_url: &str, filename: &str) -> String {
    format!("{}/image/{}", public_url.trim_end_matches('/'), filename)
}
