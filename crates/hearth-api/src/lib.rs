//! Hearth API Library
//!
//! HTTP surface of the site: public pages and forms, the staff back office under
//! `/admin`, and application setup.

mod api_doc;
mod content;
mod handlers;
mod middleware;
mod telemetry;
mod utils;

pub mod auth;
pub mod error;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::{AppState, DbState, MediaState};
