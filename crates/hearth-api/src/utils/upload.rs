//! Multipart parsing and blob lifecycle helpers for image uploads.

use axum::extract::Multipart;
use bytes::Bytes;
use hearth_core::intake::Submission;
use hearth_core::AppError;
use hearth_storage::BlobDirectory;

use crate::state::MediaState;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Strip parameters: `image/jpeg; charset=binary` -> `image/jpeg`.
fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_default()
}

/// Split a multipart body into its text fields and the single file sent as
/// `file_field`.
///
/// A file input left empty in the browser still sends a part with no filename and
/// no bytes; that counts as no file.
pub async fn read_multipart(
    mut multipart: Multipart,
    file_field: &str,
) -> Result<(Submission, Option<UploadedFile>), AppError> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let name = field.name().map(str::to_string).unwrap_or_default();

        if name == file_field {
            if file.is_some() {
                return Err(AppError::InvalidInput(format!(
                    "Send exactly one file in the '{}' field",
                    file_field
                )));
            }
            let filename = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .map(normalize_mime_type)
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?;
            if filename.is_empty() && data.is_empty() {
                continue;
            }
            file = Some(UploadedFile {
                filename,
                content_type,
                data,
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read field '{}': {}", name, e)))?;
        pairs.push((name, value));
    }

    Ok((Submission::from_pairs(pairs), file))
}

/// Validate and store an upload. Validation failures are reported on `field`.
pub async fn store_upload(
    media: &MediaState,
    directory: BlobDirectory,
    field: &str,
    file: &UploadedFile,
) -> Result<String, AppError> {
    media
        .validator
        .validate_all(&file.filename, &file.content_type, file.data.len())
        .map_err(|e| e.into_app_error(field))?;

    let path = media
        .storage
        .store(
            directory,
            &file.filename,
            &file.content_type,
            file.data.clone(),
        )
        .await?;
    tracing::debug!(path = %path, directory = directory.as_str(), "Upload stored");
    Ok(path)
}

/// Delete a blob, logging instead of failing. Used for the old image after a
/// replacement and for rolling back a fresh blob whose row was never written.
pub async fn discard_blob(media: &MediaState, path: &str) {
    if let Err(e) = media.storage.delete(path).await {
        tracing::warn!(path = %path, error = %e, "Failed to delete blob");
    }
}

/// Run a row write that references a freshly stored blob. If the write fails the
/// blob is removed again so nothing is orphaned.
pub async fn with_new_blob<T, F>(media: &MediaState, new_path: Option<&str>, write: F) -> Result<T, AppError>
where
    F: std::future::Future<Output = Result<T, AppError>>,
{
    match write.await {
        Ok(value) => Ok(value),
        Err(e) => {
            if let Some(path) = new_path {
                discard_blob(media, path).await;
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_mime_type() {
        assert_eq!(normalize_mime_type("image/JPEG; charset=binary"), "image/jpeg");
        assert_eq!(normalize_mime_type("image/png"), "image/png");
    }
}
