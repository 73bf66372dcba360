use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::error::StorageError;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Storage for uploaded image files, addressed by generated names.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store data from an async reader under a freshly generated name and
    /// return that name.
    ///
    /// The extension of `original_filename` is carried onto the stored name.
    async fn save(
        &self,
        reader: &mut (dyn AsyncRead + Unpin + Send),
        original_filename: &str,
    ) -> Result<String, StorageError>;

    /// Open a stored image, returning a streaming reader and its size in bytes.
    async fn open(&self, name: &str) -> Result<(BoxReader, u64), StorageError>;

    /// Delete a stored image.
    ///
    /// Returns `true` if the image was deleted, `false` if it did not exist.
    async fn remove(&self, name: &str) -> Result<bool, StorageError>;
}
