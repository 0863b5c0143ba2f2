//! Upload validation for image files.

use hearth_core::{AppError, Config, ValidationError};

use crate::paths::extension_of;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid file extension: {extension} (allowed: {allowed:?})")]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Content type {content_type} does not match extension {extension}")]
    ContentTypeMismatch {
        content_type: String,
        extension: String,
    },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Empty file")]
    EmptyFile,
}

impl UploadError {
    /// Convert into a field error on the form input that carried the file.
    pub fn into_app_error(self, field: &str) -> AppError {
        match self {
            UploadError::FileTooLarge { .. } => AppError::PayloadTooLarge(self.to_string()),
            other => AppError::Validation(ValidationError::single(
                field,
                format!("The {} {}.", field.replace('_', " "), other.reason()),
            )),
        }
    }

    fn reason(&self) -> String {
        match self {
            UploadError::FileTooLarge { .. } => "is too large".to_string(),
            UploadError::InvalidExtension { allowed, .. } => {
                format!("must be a file of type: {}", allowed.join(", "))
            }
            UploadError::ContentTypeMismatch { extension, .. } => {
                format!("does not look like a .{} file", extension)
            }
            UploadError::InvalidContentType { .. } => "must be an image".to_string(),
            UploadError::InvalidFilename(_) => "has an invalid filename".to_string(),
            UploadError::EmptyFile => "must not be empty".to_string(),
        }
    }
}

/// Image upload validator
pub struct UploadValidator {
    max_file_size: usize,
    allowed_extensions: Vec<String>,
    allowed_content_types: Vec<String>,
}

impl UploadValidator {
    pub fn new(
        max_file_size: usize,
        allowed_extensions: Vec<String>,
        allowed_content_types: Vec<String>,
    ) -> Self {
        Self {
            max_file_size,
            allowed_extensions,
            allowed_content_types,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.max_upload_size_bytes(),
            config.allowed_image_extensions().to_vec(),
            config.allowed_image_content_types().to_vec(),
        )
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    pub fn validate_file_size(&self, size: usize) -> Result<(), UploadError> {
        if size == 0 {
            return Err(UploadError::EmptyFile);
        }
        if size > self.max_file_size {
            return Err(UploadError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }
        Ok(())
    }

    pub fn validate_extension(&self, filename: &str) -> Result<String, UploadError> {
        let extension = extension_of(filename)
            .ok_or_else(|| UploadError::InvalidFilename(filename.to_string()))?;

        if !self.allowed_extensions.contains(&extension) {
            return Err(UploadError::InvalidExtension {
                extension,
                allowed: self.allowed_extensions.clone(),
            });
        }
        Ok(extension)
    }

    pub fn validate_content_type(&self, content_type: &str) -> Result<(), UploadError> {
        let normalized = content_type.to_lowercase();
        if !self.allowed_content_types.iter().any(|ct| ct == &normalized) {
            return Err(UploadError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }
        Ok(())
    }

    /// Content-Type must agree with the extension so a renamed file cannot pass as an image.
    pub fn validate_extension_content_type_match(
        &self,
        extension: &str,
        content_type: &str,
    ) -> Result<(), UploadError> {
        let expected: &[&str] = match extension {
            "jpg" | "jpeg" => &["image/jpeg"],
            "png" => &["image/png"],
            "gif" => &["image/gif"],
            "webp" => &["image/webp"],
            "avif" => &["image/avif"],
            "svg" => &["image/svg+xml"],
            "bmp" => &["image/bmp"],
            _ => {
                tracing::debug!(
                    extension = %extension,
                    content_type = %content_type,
                    "Unknown extension, skipping Content-Type/extension cross-validation"
                );
                return Ok(());
            }
        };

        let normalized = content_type.to_lowercase();
        if !expected.iter().any(|ct| *ct == normalized) {
            return Err(UploadError::ContentTypeMismatch {
                content_type: content_type.to_string(),
                extension: extension.to_string(),
            });
        }
        Ok(())
    }

    pub fn validate_all(
        &self,
        filename: &str,
        content_type: &str,
        size: usize,
    ) -> Result<(), UploadError> {
        self.validate_file_size(size)?;
        let extension = self.validate_extension(filename)?;
        self.validate_content_type(content_type)?;
        self.validate_extension_content_type_match(&extension, content_type)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> UploadValidator {
        UploadValidator::new(
            1024,
            vec!["jpg".into(), "jpeg".into(), "png".into()],
            vec!["image/jpeg".into(), "image/png".into()],
        )
    }

    #[test]
    fn test_accepts_matching_image() {
        assert!(validator().validate_all("photo.JPG", "image/jpeg", 10).is_ok());
        assert!(validator().validate_all("photo.png", "IMAGE/PNG", 10).is_ok());
    }

    #[test]
    fn test_rejects_size() {
        assert!(matches!(
            validator().validate_all("photo.png", "image/png", 0),
            Err(UploadError::EmptyFile)
        ));
        assert!(matches!(
            validator().validate_all("photo.png", "image/png", 2048),
            Err(UploadError::FileTooLarge { .. })
        ));
    }

    #[test]
    fn test_rejects_extension_and_type() {
        assert!(matches!(
            validator().validate_all("script.exe", "image/png", 10),
            Err(UploadError::InvalidExtension { .. })
        ));
        assert!(matches!(
            validator().validate_all("noext", "image/png", 10),
            Err(UploadError::InvalidFilename(_))
        ));
        assert!(matches!(
            validator().validate_all("photo.png", "text/html", 10),
            Err(UploadError::InvalidContentType { .. })
        ));
    }

    #[test]
    fn test_rejects_mismatch() {
        assert!(matches!(
            validator().validate_all("photo.png", "image/jpeg", 10),
            Err(UploadError::ContentTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_into_app_error() {
        let err = UploadError::EmptyFile.into_app_error("featured_image");
        let fields = err.field_errors().unwrap();
        assert_eq!(
            fields.get("featured_image"),
            Some("The featured image must not be empty.")
        );

        let err = UploadError::FileTooLarge { size: 2, max: 1 }.into_app_error("photo");
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }
}
