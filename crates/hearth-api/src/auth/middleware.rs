use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use hearth_core::AppError;
use hearth_db::StaffRepositoryTrait;
use std::sync::Arc;

use crate::auth::models::AdminContext;
use crate::auth::token::ApiToken;
use crate::error::HttpAppError;

pub const LOGIN_PATH: &str = "/login";

#[derive(Clone)]
pub struct AuthState {
    pub staff: Arc<dyn StaffRepositoryTrait>,
}

/// True when the caller is a browser navigating, not an API client.
fn wants_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|h| h.to_str().ok())
        .map(|accept| accept.contains("text/html"))
        .unwrap_or(false)
}

fn reject(headers: &HeaderMap, reason: &str) -> Response {
    tracing::debug!(reason = reason, "Admin authentication failed");
    if wants_html(headers) {
        return (
            StatusCode::SEE_OTHER,
            [(header::LOCATION, HeaderValue::from_static(LOGIN_PATH))],
        )
            .into_response();
    }
    HttpAppError(AppError::Unauthorized(reason.to_string())).into_response()
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(raw) = bearer_token(request.headers()) else {
        return reject(request.headers(), "Missing authorization header");
    };
    let Some(token) = ApiToken::parse(raw) else {
        return reject(request.headers(), "Malformed API token");
    };

    let staff = match auth_state.staff.get(token.staff_id).await {
        Ok(Some(staff)) => staff,
        Ok(None) => return reject(request.headers(), "Invalid API token"),
        Err(e) => return HttpAppError(e).into_response(),
    };

    let valid = staff.is_active
        && staff
            .api_token_hash
            .as_deref()
            .map(|stored| token.matches(stored))
            .unwrap_or(false);
    if !valid {
        return reject(request.headers(), "Invalid API token");
    }

    tracing::debug!(staff_id = %staff.id, "Staff authenticated");
    request.extensions_mut().insert(AdminContext { staff });
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wants_html_reads_accept_header() {
        let mut headers = HeaderMap::new();
        assert!(!wants_html(&headers));
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml"),
        );
        assert!(wants_html(&headers));
    }

    #[test]
    fn test_bearer_token_requires_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Token abc"));
        assert!(bearer_token(&headers).is_none());
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers), Some("abc"));
    }
}
