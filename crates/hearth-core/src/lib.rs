//! Hearth Core Library
//!
//! Domain models, error types, configuration and the inquiry intake rules shared
//! by every Hearth crate.

pub mod config;
pub mod error;
pub mod intake;
pub mod models;
pub mod slug;
pub mod validation;

pub use config::{BaseConfig, Config, SiteConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use validation::ValidationError;
