//! Route configuration and setup.
//!
//! Public pages and forms are open; everything under `/admin` sits behind the
//! staff token middleware. Health checks live in [health](health).

pub(crate) mod health;

use crate::api_doc::ApiDoc;
use crate::auth::middleware::{auth_middleware, AuthState};
use crate::handlers::{
    admission_inquiries, blog_categories, blog_posts, forms, inquiries, media, notifications,
    pages, profile, team, testimonials,
};
use crate::middleware::{
    request_id_middleware, security_headers_middleware, SecurityHeadersConfig,
};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use hearth_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

/// Room for the text fields and multipart framing around an upload.
const BODY_LIMIT_MARGIN: usize = 1024 * 1024;

/// Build the full router with its middleware stack.
pub async fn setup_routes(
    config: &Config,
    state: Arc<AppState>,
) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = Arc::new(AuthState {
        staff: state.db.staff.clone(),
    });

    let admin = admin_routes().layer(axum::middleware::from_fn_with_state(
        auth_state,
        auth_middleware,
    ));

    let image_origins = origin_of(config.local_storage_base_url())
        .into_iter()
        .collect();
    let security_headers_config = Arc::new(SecurityHeadersConfig::new(
        image_origins,
        config.is_production(),
    ));

    let http_concurrency_limit = config.http_concurrency_limit().max(1);
    tracing::info!(http_concurrency_limit, "HTTP concurrency limit layer enabled");

    let app = public_routes()
        .merge(admin)
        .merge(RapiDoc::with_openapi("/api/openapi.json", ApiDoc::openapi()).path("/docs"))
        .nest_service("/storage", ServeDir::new(config.local_storage_path()))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(
            config.max_upload_size_bytes() + BODY_LIMIT_MARGIN,
        ))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn_with_state(
            security_headers_config,
            security_headers_middleware,
        ))
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}

/// `scheme://host[:port]` of an absolute URL; `None` for relative ones.
fn origin_of(url: &str) -> Option<String> {
    let (scheme, rest) = url.split_once("://")?;
    let host = rest.split('/').next().filter(|h| !h.is_empty())?;
    Some(format!("{}://{}", scheme, host))
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/services", get(pages::services))
        .route("/faqs", get(pages::faqs))
        .route("/blog", get(pages::blog_index))
        .route("/blog/{slug}", get(pages::blog_show))
        .route("/contact", get(pages::contact_page).post(forms::submit_contact))
        .route("/inquire", get(pages::inquire_page).post(forms::submit_inquiry))
        .route("/testimonials", post(forms::submit_testimonial))
        .route("/health", get(health::health_check))
}

fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Blog posts
        .route(
            "/admin/blog-posts",
            get(blog_posts::list_posts).post(blog_posts::create_post),
        )
        .route(
            "/admin/blog-posts/{id}",
            get(blog_posts::get_post)
                .put(blog_posts::update_post)
                .post(blog_posts::update_post)
                .delete(blog_posts::delete_post),
        )
        // Blog categories
        .route(
            "/admin/blog-categories",
            get(blog_categories::list_categories).post(blog_categories::create_category),
        )
        .route(
            "/admin/blog-categories/{id}",
            get(blog_categories::get_category)
                .put(blog_categories::update_category)
                .delete(blog_categories::delete_category),
        )
        // Team
        .route("/admin/team", get(team::list_members).post(team::create_member))
        .route(
            "/admin/team/{id}",
            get(team::get_member)
                .put(team::update_member)
                .post(team::update_member)
                .delete(team::delete_member),
        )
        // Testimonials
        .route(
            "/admin/testimonials",
            get(testimonials::list_testimonials).post(testimonials::create_testimonial),
        )
        .route(
            "/admin/testimonials/{id}",
            get(testimonials::get_testimonial)
                .put(testimonials::update_testimonial)
                .delete(testimonials::delete_testimonial),
        )
        .route(
            "/admin/testimonials/{id}/approve",
            patch(testimonials::approve_testimonial),
        )
        .route(
            "/admin/testimonials/{id}/reject",
            patch(testimonials::reject_testimonial),
        )
        // Inquiries
        .route("/admin/inquiries", get(inquiries::list_inquiries))
        .route(
            "/admin/inquiries/{id}",
            get(inquiries::get_inquiry).delete(inquiries::delete_inquiry),
        )
        .route("/admin/inquiries/{id}/read", patch(inquiries::mark_inquiry_read))
        .route(
            "/admin/inquiries/{id}/status",
            patch(inquiries::update_inquiry_status),
        )
        .route(
            "/admin/admission-inquiries",
            get(admission_inquiries::list_admissions),
        )
        .route(
            "/admin/admission-inquiries/{id}",
            get(admission_inquiries::get_admission).delete(admission_inquiries::delete_admission),
        )
        .route(
            "/admin/admission-inquiries/{id}/read",
            patch(admission_inquiries::mark_admission_read),
        )
        .route(
            "/admin/admission-inquiries/{id}/status",
            patch(admission_inquiries::update_admission_status),
        )
        // Staff
        .route("/admin/notifications", get(notifications::list_notifications))
        .route(
            "/admin/notifications/read-all",
            post(notifications::mark_all_read),
        )
        .route(
            "/admin/notifications/{id}/read",
            post(notifications::mark_notification_read),
        )
        .route("/admin/media", post(media::upload_media))
        .route("/admin/profile", get(profile::show_profile))
        .route("/admin/profile/avatar", post(profile::update_avatar))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_of() {
        assert_eq!(
            origin_of("https://cdn.example.com/storage"),
            Some("https://cdn.example.com".to_string())
        );
        assert_eq!(
            origin_of("http://localhost:3000/storage"),
            Some("http://localhost:3000".to_string())
        );
        assert_eq!(origin_of("/storage"), None);
    }
}
