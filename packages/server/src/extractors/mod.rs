pub mod multipart;
pub mod photo_id;

pub use multipart::AppMultipart;
pub use photo_id::PhotoId;
