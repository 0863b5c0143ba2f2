//! OpenAPI documentation, served at `/api/openapi.json` and browsable at `/docs`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use hearth_core::models;

/// Registers the staff API token scheme referenced by every admin path.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("{staff_id}.{secret}")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hearth API",
        version = "0.1.0",
        description = "Public site and staff back office for a senior-care home: marketing pages, contact and admission inquiries, blog, team and testimonials."
    ),
    modifiers(&SecurityAddon),
    paths(
        // Public pages
        handlers::pages::home,
        handlers::pages::about,
        handlers::pages::services,
        handlers::pages::faqs,
        handlers::pages::blog_index,
        handlers::pages::blog_show,
        handlers::pages::contact_page,
        handlers::pages::inquire_page,
        // Public forms
        handlers::forms::submit_contact,
        handlers::forms::submit_inquiry,
        handlers::forms::submit_testimonial,
        // Blog
        handlers::blog_posts::list_posts,
        handlers::blog_posts::create_post,
        handlers::blog_posts::get_post,
        handlers::blog_posts::update_post,
        handlers::blog_posts::delete_post,
        handlers::blog_categories::list_categories,
        handlers::blog_categories::create_category,
        handlers::blog_categories::get_category,
        handlers::blog_categories::update_category,
        handlers::blog_categories::delete_category,
        // Team
        handlers::team::list_members,
        handlers::team::create_member,
        handlers::team::get_member,
        handlers::team::update_member,
        handlers::team::delete_member,
        // Testimonials
        handlers::testimonials::list_testimonials,
        handlers::testimonials::create_testimonial,
        handlers::testimonials::get_testimonial,
        handlers::testimonials::update_testimonial,
        handlers::testimonials::approve_testimonial,
        handlers::testimonials::reject_testimonial,
        handlers::testimonials::delete_testimonial,
        // Inquiries
        handlers::inquiries::list_inquiries,
        handlers::inquiries::get_inquiry,
        handlers::inquiries::mark_inquiry_read,
        handlers::inquiries::update_inquiry_status,
        handlers::inquiries::delete_inquiry,
        handlers::admission_inquiries::list_admissions,
        handlers::admission_inquiries::get_admission,
        handlers::admission_inquiries::mark_admission_read,
        handlers::admission_inquiries::update_admission_status,
        handlers::admission_inquiries::delete_admission,
        // Staff
        handlers::notifications::list_notifications,
        handlers::notifications::mark_notification_read,
        handlers::notifications::mark_all_read,
        handlers::media::upload_media,
        handlers::profile::show_profile,
        handlers::profile::update_avatar,
        crate::setup::routes::health::health_check,
    ),
    components(
        schemas(
            models::Inquiry,
            models::InquiryStatus,
            models::AdmissionInquiry,
            models::AdmissionStatus,
            models::BlogCategory,
            models::CategoryWithCount,
            models::BlogPost,
            models::BlogPostStatus,
            models::TeamMember,
            models::Testimonial,
            models::TestimonialStatus,
            models::StaffUser,
            models::Notification,
            models::InquirySummary,
            models::AdmissionSummary,
            handlers::views::BlogPostView,
            handlers::views::TeamMemberView,
            handlers::views::StaffView,
            handlers::blog_categories::CategoryRequest,
            handlers::testimonials::CreateTestimonialRequest,
            handlers::testimonials::UpdateTestimonialRequest,
            handlers::StatusRequest,
            handlers::notifications::NotificationView,
            handlers::notifications::ReadAllResponse,
            handlers::media::MediaUploadResponse,
            crate::setup::routes::health::HealthCheckResponse,
            error::ErrorResponse,
            error::FormErrorResponse,
        )
    ),
    tags(
        (name = "pages", description = "Public page props"),
        (name = "forms", description = "Public form submissions"),
        (name = "blog-posts", description = "Blog post management"),
        (name = "blog-categories", description = "Blog category management"),
        (name = "team", description = "Team member management"),
        (name = "testimonials", description = "Testimonial moderation"),
        (name = "inquiries", description = "Contact inquiries"),
        (name = "admission-inquiries", description = "Admission inquiries"),
        (name = "notifications", description = "Staff notification inbox"),
        (name = "media", description = "Editor image uploads"),
        (name = "profile", description = "Authenticated staff member"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
