//! Hearth Storage Library
//!
//! Blob storage for uploaded images: team photos, blog featured images, inline
//! editor images and staff avatars.
//!
//! # Path format
//!
//! Every stored blob is addressed by a relative path `{directory}/{uuid}.{ext}`,
//! for example `team/6f1c...e2.jpg`. Paths must not contain `..` or a leading `/`.
//! The public URL is `{base_url}/{path}`.

pub mod factory;
pub mod local;
pub mod paths;
pub mod traits;
pub mod validator;

pub use factory::create_storage;
pub use local::LocalStorage;
pub use paths::BlobDirectory;
pub use traits::{Storage, StorageError, StorageResult};
pub use validator::{UploadError, UploadValidator};
