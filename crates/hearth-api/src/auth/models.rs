use axum::{extract::FromRequestParts, http::request::Parts};
use hearth_core::models::StaffUser;
use hearth_core::AppError;

use crate::error::HttpAppError;

/// The authenticated staff member, resolved per request by the auth middleware.
#[derive(Clone, Debug)]
pub struct AdminContext {
    pub staff: StaffUser,
}

impl<S> FromRequestParts<S> for AdminContext
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminContext>()
            .cloned()
            .ok_or_else(|| {
                HttpAppError(AppError::Unauthorized(
                    "Staff authentication required".to_string(),
                ))
            })
    }
}
