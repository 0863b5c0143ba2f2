//! One-shot flash messages carried across a redirect in a short-lived cookie.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::convert::Infallible;

pub const FLASH_COOKIE: &str = "hearth_flash";
const FLASH_MAX_AGE_SECS: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub success: String,
}

/// Flash message left by the previous redirect, if any.
#[derive(Debug, Clone, Default)]
pub struct IncomingFlash(pub Option<Flash>);

fn read_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == FLASH_COOKIE)
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .map(|value| value.into_owned())
        .filter(|value| !value.is_empty())
}

impl<S> FromRequestParts<S> for IncomingFlash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(IncomingFlash(
            read_cookie(&parts.headers).map(|success| Flash { success }),
        ))
    }
}

impl IncomingFlash {
    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }
}

fn set_cookie(value: &str, max_age: u32) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        FLASH_COOKIE,
        urlencoding::encode(value),
        max_age
    ))
    .ok()
}

/// Header that expires the flash cookie once it has been shown.
pub fn clear_flash_cookie() -> Option<HeaderValue> {
    set_cookie("", 0)
}

/// `303 See Other` to `location`, carrying `message` to the next page.
pub fn redirect_with_flash(location: &str, message: &str) -> Response {
    let mut response = StatusCode::SEE_OTHER.into_response();
    let headers = response.headers_mut();
    if let Ok(location) = HeaderValue::from_str(location) {
        headers.insert(header::LOCATION, location);
    }
    if let Some(cookie) = set_cookie(message, FLASH_MAX_AGE_SECS) {
        headers.insert(header::SET_COOKIE, cookie);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_sets_encoded_cookie() {
        let response = redirect_with_flash("/contact", "Thanks, we'll be in touch!");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/contact");

        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("hearth_flash=Thanks%2C%20we%27ll%20be%20in%20touch%21;"));
    }

    #[test]
    fn test_read_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; hearth_flash=Saved%21"),
        );
        assert_eq!(read_cookie(&headers).as_deref(), Some("Saved!"));

        let mut empty = HeaderMap::new();
        empty.insert(header::COOKIE, HeaderValue::from_static("hearth_flash="));
        assert_eq!(read_cookie(&empty), None);
    }
}
