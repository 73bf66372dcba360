mod error;
mod name;
mod traits;

pub mod filesystem;

pub use error::StorageError;
pub use name::{NameError, image_extension, validate_image_name};
pub use traits::{BoxReader, ImageStore};
