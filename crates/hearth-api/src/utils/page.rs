use axum::{
    http::{header, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::utils::flash::{clear_flash_cookie, Flash, IncomingFlash};

/// Document handed to the client-side renderer for a public page.
#[derive(Debug, Serialize)]
pub struct PageProps<P: Serialize> {
    pub component: &'static str,
    pub props: P,
    pub url: String,
    pub flash: Option<Flash>,
}

/// Render `component` with `props`. A consumed flash message is cleared.
pub fn render<P: Serialize>(component: &'static str, props: P, uri: &Uri, flash: IncomingFlash) -> Response {
    let clear = flash.is_present();
    let page = PageProps {
        component,
        props,
        url: uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| uri.path().to_string()),
        flash: flash.0,
    };
    let mut response = Json(page).into_response();
    if clear {
        if let Some(cookie) = clear_flash_cookie() {
            response.headers_mut().insert(header::SET_COOKIE, cookie);
        }
    }
    response
}
