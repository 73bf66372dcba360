use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader};

use super::error::StorageError;
use super::name::{image_extension, validate_image_name};
use super::traits::{BoxReader, ImageStore};

/// Prefix of every generated image name.
const NAME_PREFIX: &str = "upload-";

/// Filesystem-backed image store.
///
/// Images live flat in `base_path` under generated names
/// (`upload-<uuid><.ext>`). Writes land in `{base_path}/.tmp` first and are
/// renamed into place once complete.
pub struct FilesystemImageStore {
    base_path: PathBuf,
    max_size: u64,
}

impl FilesystemImageStore {
    /// Create a new filesystem image store.
    pub async fn new(base_path: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            max_size,
        })
    }

    /// Directory holding the stored images.
    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    fn generate_name(original_filename: &str) -> String {
        format!(
            "{NAME_PREFIX}{}{}",
            uuid::Uuid::new_v4().simple(),
            image_extension(original_filename)
        )
    }

    fn temp_path(&self, name: &str) -> PathBuf {
        self.base_path.join(".tmp").join(name)
    }

    /// Resolve a stored name to its location on disk, rejecting names that
    /// are not a single plain file name.
    fn image_path(&self, name: &str) -> Result<PathBuf, StorageError> {
        let name = validate_image_name(name)
            .map_err(|e| StorageError::InvalidName(e.message().to_string()))?;
        Ok(self.base_path.join(name))
    }
}

/// Copy `reader` into `file`, failing once more than `max_size` bytes arrive.
async fn copy_limited(
    reader: &mut (dyn AsyncRead + Unpin + Send),
    file: &mut fs::File,
    max_size: u64,
) -> Result<u64, StorageError> {
    let mut buf = vec![0u8; 64 * 1024]; // 64KB read buffer
    let mut total_bytes: u64 = 0;

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }

        total_bytes += n as u64;
        if total_bytes > max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: total_bytes,
                limit: max_size,
            });
        }

        file.write_all(&buf[..n]).await?;
    }

    file.flush().await?;
    Ok(total_bytes)
}

#[async_trait]
impl ImageStore for FilesystemImageStore {
    async fn save(
        &self,
        reader: &mut (dyn AsyncRead + Unpin + Send),
        original_filename: &str,
    ) -> Result<String, StorageError> {
        let name = Self::generate_name(original_filename);
        let temp_path = self.temp_path(&name);

        let mut temp_file = fs::File::create(&temp_path).await?;
        let written = copy_limited(reader, &mut temp_file, self.max_size).await;
        drop(temp_file);

        let total_bytes = match written {
            Ok(total_bytes) => total_bytes,
            Err(e) => {
                let _ = fs::remove_file(&temp_path).await;
                return Err(e);
            }
        };

        let image_path = self.base_path.join(&name);
        if let Err(e) = fs::rename(&temp_path, &image_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        tracing::debug!(name = %name, size = total_bytes, "Stored image");
        Ok(name)
    }

    async fn open(&self, name: &str) -> Result<(BoxReader, u64), StorageError> {
        let image_path = self.image_path(name)?;
        let file = match fs::File::open(&image_path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let meta = file.metadata().await?;
        if !meta.is_file() {
            return Err(StorageError::NotFound(name.to_string()));
        }

        Ok((Box::new(BufReader::new(file)), meta.len()))
    }

    async fn remove(&self, name: &str) -> Result<bool, StorageError> {
        let image_path = self.image_path(name)?;
        match fs::remove_file(&image_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
