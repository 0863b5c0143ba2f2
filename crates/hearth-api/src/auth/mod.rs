//! Staff authentication for the `/admin` surface.

pub mod middleware;
pub mod models;
pub mod token;

pub use models::AdminContext;
pub use token::{hash_secret, ApiToken};
