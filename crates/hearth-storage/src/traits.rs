//! Storage abstraction trait

use async_trait::async_trait;
use bytes::Bytes;
use hearth_core::AppError;
use thiserror::Error;

use crate::paths::BlobDirectory;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(path) => AppError::NotFound(format!("File {}", path)),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Blob store contract.
///
/// Callers hand over a file and get back a stable relative path. That path is
/// what gets persisted on the owning row; [`Storage::url`] turns it into a public
/// URL on demand.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under a fresh path in `directory` and return that path.
    async fn store(
        &self,
        directory: BlobDirectory,
        filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<String>;

    /// Read a blob back.
    async fn download(&self, path: &str) -> StorageResult<Vec<u8>>;

    /// Delete a blob. Deleting a path that no longer exists succeeds.
    async fn delete(&self, path: &str) -> StorageResult<()>;

    async fn exists(&self, path: &str) -> StorageResult<bool>;

    /// Public URL for a stored path.
    fn url(&self, path: &str) -> String;

    /// Readiness check used by `/health`.
    async fn health_check(&self) -> StorageResult<()>;
}
