use crate::paths::{generate_blob_path, is_safe_path, BlobDirectory};
use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for blobs (e.g., "./storage")
    /// * `base_url` - Public URL the root is served under (e.g., "http://localhost:4000/storage")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a relative blob path under the storage root.
    ///
    /// Rejects traversal sequences and, for paths that already exist, anything whose
    /// canonical form lands outside the root (e.g. through a symlink).
    fn resolve(&self, path: &str) -> StorageResult<PathBuf> {
        if !is_safe_path(path) {
            return Err(StorageError::InvalidPath(
                "Storage path contains invalid characters".to_string(),
            ));
        }

        let full = self.base_path.join(path);

        if let Ok(canonical) = full.canonicalize() {
            let base_canonical = self.base_path.canonicalize().map_err(|e| {
                StorageError::ConfigError(format!("Failed to canonicalize base path: {}", e))
            })?;
            if canonical.strip_prefix(&base_canonical).is_err() {
                return Err(StorageError::InvalidPath(
                    "Storage path resolves outside storage directory".to_string(),
                ));
            }
        }

        Ok(full)
    }

    async fn write(&self, path: &str, data: &[u8]) -> StorageResult<PathBuf> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(&full).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", full.display(), e))
        })?;
        file.write_all(data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", full.display(), e))
        })?;
        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", full.display(), e))
        })?;

        Ok(full)
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn store(
        &self,
        directory: BlobDirectory,
        filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<String> {
        let path = generate_blob_path(directory, filename);
        let start = std::time::Instant::now();

        let full = self.write(&path, &data).await?;

        tracing::info!(
            file = %full.display(),
            path = %path,
            directory = %directory,
            content_type = %content_type,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Blob stored"
        );

        Ok(path)
    }

    async fn download(&self, path: &str) -> StorageResult<Vec<u8>> {
        let full = self.resolve(path)?;

        if !fs::try_exists(&full).await.unwrap_or(false) {
            return Err(StorageError::NotFound(path.to_string()));
        }

        fs::read(&full).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to read file {}: {}", full.display(), e))
        })
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        let full = self.resolve(path)?;

        if !fs::try_exists(&full).await.unwrap_or(false) {
            tracing::debug!(path = %path, "Blob already absent");
            return Ok(());
        }

        fs::remove_file(&full).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", full.display(), e))
        })?;

        tracing::info!(path = %path, "Blob deleted");
        Ok(())
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        let full = self.resolve(path)?;
        Ok(fs::try_exists(&full).await.unwrap_or(false))
    }

    fn url(&self, path: &str) -> String {
        let encoded: Vec<String> = path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!("{}/{}", self.base_url, encoded.join("/"))
    }

    async fn health_check(&self) -> StorageResult<()> {
        let meta = fs::metadata(&self.base_path).await?;
        if !meta.is_dir() {
            return Err(StorageError::ConfigError(format!(
                "{} is not a directory",
                self.base_path.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn storage(dir: &Path) -> LocalStorage {
        LocalStorage::new(dir, "http://localhost:4000/storage/".to_string())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_store_and_download() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let path = storage
            .store(
                BlobDirectory::Team,
                "portrait.png",
                "image/png",
                Bytes::from_static(b"png bytes"),
            )
            .await
            .unwrap();

        assert!(path.starts_with("team/"));
        assert!(path.ends_with(".png"));
        assert!(dir.path().join(&path).exists());
        assert_eq!(storage.download(&path).await.unwrap(), b"png bytes".to_vec());
        assert_eq!(
            storage.url(&path),
            format!("http://localhost:4000/storage/{}", path)
        );
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let result = storage.download("../../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidPath(_))));

        let result = storage.delete("../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidPath(_))));

        let result = storage.exists("/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidPath(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_blob_and_tolerates_missing() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let path = storage
            .store(
                BlobDirectory::Avatars,
                "me.jpg",
                "image/jpeg",
                Bytes::from_static(b"jpeg"),
            )
            .await
            .unwrap();
        assert!(storage.exists(&path).await.unwrap());

        storage.delete(&path).await.unwrap();
        assert!(!storage.exists(&path).await.unwrap());
        assert!(matches!(
            storage.download(&path).await,
            Err(StorageError::NotFound(_))
        ));

        assert!(storage.delete("team/nonexistent.jpg").await.is_ok());
    }

    #[tokio::test]
    async fn test_health_check() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;
        assert!(storage.health_check().await.is_ok());
    }
}
