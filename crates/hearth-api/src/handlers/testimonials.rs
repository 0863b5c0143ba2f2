use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use hearth_core::models::{
    NewTestimonial, PageRequest, Testimonial, TestimonialStatus, TestimonialUpdate,
};
use hearth_core::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::{HttpAppError, ValidatedJson};
use crate::handlers::not_found;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTestimonialRequest {
    #[validate(length(min = 1, max = 255, message = "The name field is required."))]
    pub name: String,
    #[validate(length(min = 1, max = 255, message = "The relation field is required."))]
    pub relation: String,
    #[validate(length(min = 1, max = 5000, message = "The content field is required."))]
    pub content: String,
    #[validate(range(min = 1, max = 5, message = "The rating must be between 1 and 5."))]
    pub rating: i16,
    /// Defaults to approved for admin-entered testimonials
    pub status: Option<TestimonialStatus>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTestimonialRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub relation: Option<String>,
    #[validate(length(min = 1, max = 5000))]
    pub content: Option<String>,
    #[validate(range(min = 1, max = 5, message = "The rating must be between 1 and 5."))]
    pub rating: Option<i16>,
    pub status: Option<TestimonialStatus>,
}

async fn set_status(
    state: &AppState,
    id: Uuid,
    status: TestimonialStatus,
) -> Result<Testimonial, AppError> {
    let testimonial = state
        .db
        .testimonials
        .update(
            id,
            TestimonialUpdate {
                status: Some(status),
                ..Default::default()
            },
        )
        .await?
        .ok_or_else(|| not_found("Testimonial"))?;
    tracing::info!(testimonial_id = %id, status = %status, "Testimonial status changed");
    Ok(testimonial)
}

#[utoipa::path(
    get,
    path = "/admin/testimonials",
    tag = "testimonials",
    params(PageRequest),
    responses((status = 200, description = "Testimonials of every status, newest first")),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn list_testimonials(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    Ok(Json(state.db.testimonials.list(page).await?))
}

#[utoipa::path(
    post,
    path = "/admin/testimonials",
    tag = "testimonials",
    request_body = CreateTestimonialRequest,
    responses(
        (status = 201, description = "Testimonial created", body = Testimonial),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request))]
pub async fn create_testimonial(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateTestimonialRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate()?;
    let testimonial = state
        .db
        .testimonials
        .create(NewTestimonial {
            name: request.name.trim().to_string(),
            relation: request.relation.trim().to_string(),
            content: request.content.trim().to_string(),
            rating: request.rating,
            status: request.status.unwrap_or(TestimonialStatus::Approved),
        })
        .await?;
    tracing::info!(testimonial_id = %testimonial.id, "Testimonial created by staff");
    Ok((StatusCode::CREATED, Json(testimonial)))
}

#[utoipa::path(
    get,
    path = "/admin/testimonials/{id}",
    tag = "testimonials",
    params(("id" = Uuid, Path, description = "Testimonial ID")),
    responses(
        (status = 200, description = "Testimonial", body = Testimonial),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn get_testimonial(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let testimonial = state
        .db
        .testimonials
        .get(id)
        .await?
        .ok_or_else(|| not_found("Testimonial"))?;
    Ok(Json(testimonial))
}

#[utoipa::path(
    put,
    path = "/admin/testimonials/{id}",
    tag = "testimonials",
    params(("id" = Uuid, Path, description = "Testimonial ID")),
    request_body = UpdateTestimonialRequest,
    responses(
        (status = 200, description = "Testimonial updated", body = Testimonial),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request))]
pub async fn update_testimonial(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateTestimonialRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate()?;
    let trimmed = |value: Option<String>| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
    let testimonial = state
        .db
        .testimonials
        .update(
            id,
            TestimonialUpdate {
                name: trimmed(request.name),
                relation: trimmed(request.relation),
                content: trimmed(request.content),
                rating: request.rating,
                status: request.status,
            },
        )
        .await?
        .ok_or_else(|| not_found("Testimonial"))?;
    Ok(Json(testimonial))
}

#[utoipa::path(
    patch,
    path = "/admin/testimonials/{id}/approve",
    tag = "testimonials",
    params(("id" = Uuid, Path, description = "Testimonial ID")),
    responses(
        (status = 200, description = "Testimonial approved", body = Testimonial),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn approve_testimonial(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    Ok(Json(set_status(&state, id, TestimonialStatus::Approved).await?))
}

#[utoipa::path(
    patch,
    path = "/admin/testimonials/{id}/reject",
    tag = "testimonials",
    params(("id" = Uuid, Path, description = "Testimonial ID")),
    responses(
        (status = 200, description = "Testimonial rejected", body = Testimonial),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn reject_testimonial(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    Ok(Json(set_status(&state, id, TestimonialStatus::Rejected).await?))
}

#[utoipa::path(
    delete,
    path = "/admin/testimonials/{id}",
    tag = "testimonials",
    params(("id" = Uuid, Path, description = "Testimonial ID")),
    responses(
        (status = 204, description = "Testimonial deleted"),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn delete_testimonial(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    if !state.db.testimonials.delete(id).await? {
        return Err(not_found("Testimonial").into());
    }
    tracing::info!(testimonial_id = %id, "Testimonial deleted");
    Ok(StatusCode::NO_CONTENT)
}
