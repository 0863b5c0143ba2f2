//! Staff notification inbox.
//!
//! Notifications carry their own summary, so they keep rendering after the
//! inquiry they point at has been deleted. `source_available` tells the client
//! whether a link to that record would still resolve.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use hearth_core::models::{Notification, NotificationSource, Page, PageRequest};
use hearth_core::AppError;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AdminContext;
use crate::error::HttpAppError;
use crate::handlers::not_found;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationView {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub notification_type: String,
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
    pub headline: Option<String>,
    pub source_available: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl NotificationView {
    fn new(notification: Notification, source_available: bool) -> Self {
        let headline = notification.payload().map(|p| p.headline());
        Self {
            id: notification.id,
            notification_type: notification.notification_type,
            data: notification.data,
            headline,
            source_available,
            read_at: notification.read_at,
            created_at: notification.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NotificationInbox {
    #[serde(flatten)]
    pub page: Page<NotificationView>,
    pub unread_count: i64,
}

async fn source_available(state: &AppState, notification: &Notification) -> Result<bool, AppError> {
    let Some(payload) = notification.payload() else {
        return Ok(false);
    };
    Ok(match payload.source() {
        NotificationSource::Inquiry(id) => state.db.inquiries.get(id).await?.is_some(),
        NotificationSource::AdmissionInquiry(id) => state.db.admissions.get(id).await?.is_some(),
    })
}

#[utoipa::path(
    get,
    path = "/admin/notifications",
    tag = "notifications",
    params(PageRequest),
    responses((status = 200, description = "The caller's notifications, newest first, with the unread count")),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, admin), fields(staff_id = %admin.staff.id))]
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let recipient = admin.staff.id;
    let page = state
        .db
        .notifications
        .list_for_recipient(recipient, page)
        .await?;

    let mut available = Vec::with_capacity(page.data.len());
    for notification in &page.data {
        available.push(source_available(&state, notification).await?);
    }
    let mut available = available.into_iter();
    let page = page.map(|n| NotificationView::new(n, available.next().unwrap_or(false)));

    let unread_count = state.db.notifications.unread_count(recipient).await?;
    Ok(Json(NotificationInbox { page, unread_count }))
}

#[utoipa::path(
    post,
    path = "/admin/notifications/{id}/read",
    tag = "notifications",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification marked read", body = Notification),
        (status = 404, description = "Not one of the caller's notifications", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, admin), fields(staff_id = %admin.staff.id))]
pub async fn mark_notification_read(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let notification = state
        .db
        .notifications
        .mark_read(admin.staff.id, id)
        .await?
        .ok_or_else(|| not_found("Notification"))?;
    Ok(Json(notification))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReadAllResponse {
    pub updated: u64,
}

#[utoipa::path(
    post,
    path = "/admin/notifications/read-all",
    tag = "notifications",
    responses((status = 200, description = "Every unread notification of the caller marked read", body = ReadAllResponse)),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, admin), fields(staff_id = %admin.staff.id))]
pub async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let updated = state.db.notifications.mark_all_read(admin.staff.id).await?;
    tracing::debug!(updated, "Notifications marked read");
    Ok(Json(ReadAllResponse { updated }))
}
