//! Local filesystem image store.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use postboard_core::ports::{ImageStore, StorageError};

/// Stores images under a root directory; image references are paths relative to it.
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve `path` under the root. A leading `/` is relative to the root;
    /// anything that could climb out of it resolves to nothing.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let mut resolved = self.root.clone();
        for component in Path::new(path).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::RootDir | Component::CurDir => {}
                Component::ParentDir | Component::Prefix(_) => return None,
            }
        }
        Some(resolved)
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn clear_image(&self, path: &str) -> Result<(), StorageError> {
        if path.is_empty() {
            tracing::debug!("No image to clear");
            return Ok(());
        }

        let Some(file) = self.resolve(path) else {
            tracing::warn!(image = %path, "Skipping image outside the image root");
            return Ok(());
        };

        match tokio::fs::remove_file(&file).await {
            Ok(()) => {
                tracing::info!(image = %path, "Image cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(image = %path, "Image already gone");
                Ok(())
            }
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }
}
