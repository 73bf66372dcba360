pub mod service;

pub use service::{NewPhoto, PhotoService, RecordError, photo_service};
