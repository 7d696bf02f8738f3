//! Image storage port.

use async_trait::async_trait;

/// Removes stored images that are no longer referenced.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Delete the image stored at `path`. Paths that name no stored file are ignored.
    async fn clear_image(&self, path: &str) -> Result<(), StorageError>;
}

/// Image storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(String),
}
