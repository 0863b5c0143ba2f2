//! Blob directories and path generation shared by every backend.

use std::fmt;
use std::path::Path;
use uuid::Uuid;

/// Logical directory a blob is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlobDirectory {
    Team,
    BlogFeatured,
    BlogImages,
    Avatars,
}

impl BlobDirectory {
    pub const ALL: [BlobDirectory; 4] = [
        BlobDirectory::Team,
        BlobDirectory::BlogFeatured,
        BlobDirectory::BlogImages,
        BlobDirectory::Avatars,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlobDirectory::Team => "team",
            BlobDirectory::BlogFeatured => "blog/featured",
            BlobDirectory::BlogImages => "blog/images",
            BlobDirectory::Avatars => "avatars",
        }
    }
}

impl fmt::Display for BlobDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercased extension of `filename`, if it has one made of ASCII alphanumerics.
pub fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| e.to_lowercase())
}

/// Fresh path for a new blob. The original filename only contributes its extension.
pub fn generate_blob_path(directory: BlobDirectory, original_filename: &str) -> String {
    let ext = extension_of(original_filename).unwrap_or_else(|| "bin".to_string());
    format!("{}/{}.{}", directory.as_str(), Uuid::new_v4(), ext)
}

/// Reject paths that could escape the storage root.
pub fn is_safe_path(path: &str) -> bool {
    !path.is_empty()
        && !path.contains("..")
        && !path.starts_with('/')
        && !path.contains('\\')
        && !path.contains('\0')
}
