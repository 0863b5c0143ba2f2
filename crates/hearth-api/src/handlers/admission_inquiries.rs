use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use hearth_core::models::{parse_status, AdmissionInquiry, AdmissionStatus, PageRequest};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{HttpAppError, ValidatedJson};
use crate::handlers::{not_found, StatusRequest};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/admin/admission-inquiries",
    tag = "admission-inquiries",
    params(PageRequest),
    responses((status = 200, description = "Admission inquiries, newest first")),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn list_admissions(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    Ok(Json(state.db.admissions.list(page).await?))
}

#[utoipa::path(
    get,
    path = "/admin/admission-inquiries/{id}",
    tag = "admission-inquiries",
    params(("id" = Uuid, Path, description = "Admission inquiry ID")),
    responses(
        (status = 200, description = "Admission inquiry", body = AdmissionInquiry),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn get_admission(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let admission = state
        .db
        .admissions
        .get(id)
        .await?
        .ok_or_else(|| not_found("Admission inquiry"))?;
    Ok(Json(admission))
}

#[utoipa::path(
    patch,
    path = "/admin/admission-inquiries/{id}/read",
    tag = "admission-inquiries",
    params(("id" = Uuid, Path, description = "Admission inquiry ID")),
    responses(
        (status = 200, description = "Admission inquiry marked read; read_at keeps its first value", body = AdmissionInquiry),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn mark_admission_read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let admission = state.db.admissions.transition(id, AdmissionStatus::Read).await?;
    Ok(Json(admission))
}

#[utoipa::path(
    patch,
    path = "/admin/admission-inquiries/{id}/status",
    tag = "admission-inquiries",
    params(("id" = Uuid, Path, description = "Admission inquiry ID")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Status changed", body = AdmissionInquiry),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Unknown status", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request))]
pub async fn update_admission_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<StatusRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let status: AdmissionStatus = parse_status(request.status.trim())?;
    let admission = state.db.admissions.transition(id, status).await?;
    tracing::info!(admission_inquiry_id = %id, status = ?status, "Admission inquiry status changed");
    Ok(Json(admission))
}

#[utoipa::path(
    delete,
    path = "/admin/admission-inquiries/{id}",
    tag = "admission-inquiries",
    params(("id" = Uuid, Path, description = "Admission inquiry ID")),
    responses(
        (status = 204, description = "Admission inquiry deleted; its notifications remain"),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn delete_admission(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    if !state.db.admissions.delete(id).await? {
        return Err(not_found("Admission inquiry").into());
    }
    tracing::info!(admission_inquiry_id = %id, "Admission inquiry deleted");
    Ok(StatusCode::NO_CONTENT)
}
