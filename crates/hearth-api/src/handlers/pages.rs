//! Public marketing pages, returned as page props for the client renderer.

use axum::{
    extract::{Path, Query, State},
    http::Uri,
    response::Response,
};
use hearth_core::intake::{AdmissionStep, WizardState};
use hearth_core::models::{
    CategoryWithCount, Choice, ContactMethod, FeedingTube, Gender, Page, PageRequest, Testimonial,
    Title,
};
use hearth_core::AppError;
use hearth_db::PublishedPostQuery;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::IntoParams;

use crate::content::{
    Faq, Service, CARE_SERVICES, FAQS, MEDICAL_CONDITIONS, MOVE_IN_TIMELINES, REFERRAL_SOURCES,
    SERVICES, TOUR_TIMES,
};
use crate::error::HttpAppError;
use crate::handlers::views::{BlogPostView, TeamMemberView};
use crate::state::AppState;
use crate::utils::flash::IncomingFlash;
use crate::utils::page::render;

pub const HOME_TESTIMONIALS: i64 = 3;
pub const RECENT_POSTS: i64 = 3;
pub const BLOG_PER_PAGE: u32 = 9;

async fn active_team(state: &AppState) -> Result<Vec<TeamMemberView>, AppError> {
    Ok(state
        .db
        .team
        .list_active()
        .await?
        .into_iter()
        .map(|member| TeamMemberView::new(member, &state.media))
        .collect())
}

#[derive(Serialize)]
struct HomeProps {
    testimonials: Vec<Testimonial>,
    recent_posts: Vec<BlogPostView>,
    team: Vec<TeamMemberView>,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "pages",
    responses((status = 200, description = "Home page props"))
)]
#[tracing::instrument(skip(state, flash))]
pub async fn home(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    flash: IncomingFlash,
) -> Result<Response, HttpAppError> {
    let testimonials = state.db.testimonials.list_approved(HOME_TESTIMONIALS).await?;
    let recent_posts = state
        .db
        .posts
        .recent_published(None, RECENT_POSTS)
        .await?
        .into_iter()
        .map(|post| BlogPostView::new(post, &state.media))
        .collect();
    let team = active_team(&state).await?;

    Ok(render(
        "Home",
        HomeProps {
            testimonials,
            recent_posts,
            team,
        },
        &uri,
        flash,
    ))
}

#[derive(Serialize)]
struct AboutProps {
    team: Vec<TeamMemberView>,
}

#[utoipa::path(
    get,
    path = "/about",
    tag = "pages",
    responses((status = 200, description = "Active team members in display order"))
)]
#[tracing::instrument(skip(state, flash))]
pub async fn about(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    flash: IncomingFlash,
) -> Result<Response, HttpAppError> {
    let team = active_team(&state).await?;
    Ok(render("About", AboutProps { team }, &uri, flash))
}

#[derive(Serialize)]
struct ServicesProps {
    services: &'static [Service],
}

#[utoipa::path(get, path = "/services", tag = "pages", responses((status = 200, description = "Services")))]
pub async fn services(uri: Uri, flash: IncomingFlash) -> Response {
    render("Services", ServicesProps { services: SERVICES }, &uri, flash)
}

#[derive(Serialize)]
struct FaqsProps {
    faqs: &'static [Faq],
}

#[utoipa::path(get, path = "/faqs", tag = "pages", responses((status = 200, description = "FAQs")))]
pub async fn faqs(uri: Uri, flash: IncomingFlash) -> Response {
    render("Faqs", FaqsProps { faqs: FAQS }, &uri, flash)
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct BlogIndexQuery {
    pub page: Option<u32>,
    /// Category slug
    pub category: Option<String>,
}

#[derive(Serialize)]
struct BlogIndexProps {
    posts: Page<BlogPostView>,
    categories: Vec<CategoryWithCount>,
    active_category: Option<String>,
}

#[utoipa::path(
    get,
    path = "/blog",
    tag = "pages",
    params(BlogIndexQuery),
    responses((status = 200, description = "Published posts, newest published first"))
)]
#[tracing::instrument(skip(state, flash))]
pub async fn blog_index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BlogIndexQuery>,
    uri: Uri,
    flash: IncomingFlash,
) -> Result<Response, HttpAppError> {
    let category = query
        .category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    let posts = state
        .db
        .posts
        .list_published(PublishedPostQuery {
            page: PageRequest { page: query.page },
            per_page: BLOG_PER_PAGE,
            category: category.clone(),
        })
        .await?
        .map(|post| BlogPostView::new(post, &state.media));
    let categories = state.db.categories.list_with_counts().await?;

    Ok(render(
        "Blog/Index",
        BlogIndexProps {
            posts,
            categories,
            active_category: category,
        },
        &uri,
        flash,
    ))
}

#[derive(Serialize)]
struct BlogShowProps {
    post: BlogPostView,
    category: Option<CategoryWithCount>,
    recent_posts: Vec<BlogPostView>,
    categories: Vec<CategoryWithCount>,
}

#[utoipa::path(
    get,
    path = "/blog/{slug}",
    tag = "pages",
    params(("slug" = String, Path, description = "Post slug")),
    responses(
        (status = 200, description = "Post with sidebar data"),
        (status = 404, description = "No published post with that slug", body = crate::error::ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, flash))]
pub async fn blog_show(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    uri: Uri,
    flash: IncomingFlash,
) -> Result<Response, HttpAppError> {
    let post = state
        .db
        .posts
        .get_published_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Blog post '{}' not found", slug)))?;

    let recent_posts = state
        .db
        .posts
        .recent_published(Some(post.id), RECENT_POSTS)
        .await?
        .into_iter()
        .map(|p| BlogPostView::new(p, &state.media))
        .collect();
    let categories = state.db.categories.list_with_counts().await?;
    let category = categories
        .iter()
        .find(|c| c.id == post.category_id)
        .cloned();

    Ok(render(
        "Blog/Show",
        BlogShowProps {
            post: BlogPostView::new(post, &state.media),
            category,
            recent_posts,
            categories,
        },
        &uri,
        flash,
    ))
}

#[derive(Serialize)]
struct ContactProps {
    preferred_contact_methods: Vec<&'static str>,
}

#[utoipa::path(get, path = "/contact", tag = "pages", responses((status = 200, description = "Contact form props")))]
pub async fn contact_page(uri: Uri, flash: IncomingFlash) -> Response {
    render(
        "Contact",
        ContactProps {
            preferred_contact_methods: ContactMethod::options(),
        },
        &uri,
        flash,
    )
}

#[derive(Serialize)]
struct InquireOptions {
    titles: Vec<&'static str>,
    preferred_contact_methods: Vec<&'static str>,
    genders: Vec<&'static str>,
    feeding_tube: Vec<&'static str>,
    care_services: &'static [&'static str],
    medical_conditions: &'static [&'static str],
    move_in_timelines: &'static [&'static str],
    referral_sources: &'static [&'static str],
    tour_times: &'static [&'static str],
}

#[derive(Serialize)]
struct WizardStep {
    number: u8,
    key: AdmissionStep,
    fields: &'static [&'static str],
}

#[derive(Serialize)]
struct InquireProps {
    options: InquireOptions,
    steps: Vec<WizardStep>,
    wizard: WizardState,
    /// First date a tour can be requested for
    min_tour_date: Option<chrono::NaiveDate>,
    /// Last accepted date of birth
    max_date_of_birth: Option<chrono::NaiveDate>,
}

#[utoipa::path(get, path = "/inquire", tag = "pages", responses((status = 200, description = "Admission wizard props")))]
#[tracing::instrument(skip(state, flash))]
pub async fn inquire_page(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    flash: IncomingFlash,
) -> Response {
    let today = state.config.today();
    let props = InquireProps {
        options: InquireOptions {
            titles: Title::options(),
            preferred_contact_methods: ContactMethod::options(),
            genders: Gender::options(),
            feeding_tube: FeedingTube::options(),
            care_services: CARE_SERVICES,
            medical_conditions: MEDICAL_CONDITIONS,
            move_in_timelines: MOVE_IN_TIMELINES,
            referral_sources: REFERRAL_SOURCES,
            tour_times: TOUR_TIMES,
        },
        steps: AdmissionStep::ALL
            .iter()
            .map(|step| WizardStep {
                number: step.number(),
                key: *step,
                fields: step.fields(),
            })
            .collect(),
        wizard: WizardState::default(),
        min_tour_date: today.succ_opt(),
        max_date_of_birth: today.pred_opt(),
    };
    render("Inquire", props, &uri, flash)
}
