use axum::http::HeaderValue;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct SecurityHeadersConfig {
    /// Extra image origins, e.g. the blob store's host when it differs from the site
    pub image_origins: Vec<String>,
    pub is_production: bool,
}

impl SecurityHeadersConfig {
    pub fn new(image_origins: Vec<String>, is_production: bool) -> Self {
        Self {
            image_origins,
            is_production,
        }
    }

    fn build_csp(&self) -> String {
        let img_src = if self.image_origins.is_empty() {
            "img-src 'self' data:".to_string()
        } else {
            format!("img-src 'self' data: {}", self.image_origins.join(" "))
        };
        [
            "default-src 'self'",
            "script-src 'self'",
            "style-src 'self'",
            img_src.as_str(),
            "font-src 'self' data:",
            "connect-src 'self'",
            "frame-ancestors 'none'",
        ]
        .join("; ")
    }
}

/// Adds security headers to every response.
pub async fn security_headers_middleware(
    State(config): State<Arc<SecurityHeadersConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let is_blob = request.uri().path().starts_with("/storage/");
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    if config.is_production {
        headers.insert(
            "Strict-Transport-Security",
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }

    if let Ok(csp) = HeaderValue::from_str(&config.build_csp()) {
        headers.insert("Content-Security-Policy", csp);
    }

    headers.insert(
        "Permissions-Policy",
        HeaderValue::from_static("geolocation=(), microphone=(), camera=()"),
    );

    // Stored images are immutable: every upload gets a fresh path.
    if !is_blob {
        headers.insert("Cache-Control", HeaderValue::from_static("no-store, private"));
    }

    response
}
