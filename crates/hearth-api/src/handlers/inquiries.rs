use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use hearth_core::models::{parse_status, Inquiry, InquiryStatus, PageRequest};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{HttpAppError, ValidatedJson};
use crate::handlers::{not_found, StatusRequest};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/admin/inquiries",
    tag = "inquiries",
    params(PageRequest),
    responses((status = 200, description = "Contact inquiries, newest first")),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn list_inquiries(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    Ok(Json(state.db.inquiries.list(page).await?))
}

#[utoipa::path(
    get,
    path = "/admin/inquiries/{id}",
    tag = "inquiries",
    params(("id" = Uuid, Path, description = "Inquiry ID")),
    responses(
        (status = 200, description = "Inquiry", body = Inquiry),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn get_inquiry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let inquiry = state
        .db
        .inquiries
        .get(id)
        .await?
        .ok_or_else(|| not_found("Inquiry"))?;
    Ok(Json(inquiry))
}

#[utoipa::path(
    patch,
    path = "/admin/inquiries/{id}/read",
    tag = "inquiries",
    params(("id" = Uuid, Path, description = "Inquiry ID")),
    responses(
        (status = 200, description = "Inquiry marked read; read_at keeps its first value", body = Inquiry),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn mark_inquiry_read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let inquiry = state.db.inquiries.transition(id, InquiryStatus::Read).await?;
    Ok(Json(inquiry))
}

#[utoipa::path(
    patch,
    path = "/admin/inquiries/{id}/status",
    tag = "inquiries",
    params(("id" = Uuid, Path, description = "Inquiry ID")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Status changed", body = Inquiry),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Unknown status", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request))]
pub async fn update_inquiry_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<StatusRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let status: InquiryStatus = parse_status(request.status.trim())?;
    let inquiry = state.db.inquiries.transition(id, status).await?;
    tracing::info!(inquiry_id = %id, status = ?status, "Inquiry status changed");
    Ok(Json(inquiry))
}

#[utoipa::path(
    delete,
    path = "/admin/inquiries/{id}",
    tag = "inquiries",
    params(("id" = Uuid, Path, description = "Inquiry ID")),
    responses(
        (status = 204, description = "Inquiry deleted; its notifications remain"),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn delete_inquiry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    if !state.db.inquiries.delete(id).await? {
        return Err(not_found("Inquiry").into());
    }
    tracing::info!(inquiry_id = %id, "Inquiry deleted");
    Ok(StatusCode::NO_CONTENT)
}
