pub mod admission_inquiries;
pub mod blog_categories;
pub mod blog_posts;
pub mod forms;
pub mod inquiries;
pub mod media;
pub mod notifications;
pub mod pages;
pub mod profile;
pub mod team;
pub mod testimonials;
pub mod views;

use hearth_core::slug::slug_candidates;
use hearth_core::AppError;
use serde::Deserialize;
use std::future::Future;
use utoipa::ToSchema;

/// Body of the `PATCH .../status` endpoints. The value is checked against the
/// entity's own status set.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusRequest {
    pub status: String,
}

/// First free slug derived from `base`. `taken` is asked about each candidate in turn.
pub(crate) async fn unique_slug<F, Fut>(base: &str, mut taken: F) -> Result<String, AppError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, AppError>>,
{
    for candidate in slug_candidates(base) {
        if !taken(candidate.clone()).await? {
            return Ok(candidate);
        }
    }
    Ok(base.to_string())
}

pub(crate) fn not_found(what: &str) -> AppError {
    AppError::NotFound(format!("{} not found", what))
}
