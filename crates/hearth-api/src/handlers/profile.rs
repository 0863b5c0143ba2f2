use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};
use hearth_core::AppError;
use hearth_storage::BlobDirectory;
use std::sync::Arc;

use crate::auth::AdminContext;
use crate::error::HttpAppError;
use crate::handlers::not_found;
use crate::handlers::views::StaffView;
use crate::state::AppState;
use crate::utils::upload::{discard_blob, read_multipart, store_upload, with_new_blob};

const AVATAR_FIELD: &str = "avatar";

#[utoipa::path(
    get,
    path = "/admin/profile",
    tag = "profile",
    responses((status = 200, description = "The authenticated staff member", body = StaffView)),
    security(("bearer_auth" = []))
)]
pub async fn show_profile(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
) -> impl IntoResponse {
    Json(StaffView::new(admin.staff, &state.media))
}

/// Replace the caller's avatar. The old blob goes only once the row points at
/// the new one.
#[utoipa::path(
    post,
    path = "/admin/profile/avatar",
    tag = "profile",
    request_body(content_type = "multipart/form-data", description = "Image in the `avatar` field"),
    responses(
        (status = 200, description = "Avatar replaced", body = StaffView),
        (status = 422, description = "Missing or rejected file", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, admin, multipart), fields(staff_id = %admin.staff.id))]
pub async fn update_avatar(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let (_, file) = read_multipart(multipart, AVATAR_FIELD).await?;
    let file =
        file.ok_or_else(|| AppError::field(AVATAR_FIELD, "The avatar field is required."))?;

    let path = store_upload(&state.media, BlobDirectory::Avatars, AVATAR_FIELD, &file).await?;
    let staff_id = admin.staff.id;
    let staff = with_new_blob(&state.media, Some(path.as_str()), async {
        state
            .db
            .staff
            .update_avatar(staff_id, Some(path.clone()))
            .await?
            .ok_or_else(|| not_found("Staff user"))
    })
    .await?;

    if let Some(old) = admin.staff.avatar.as_deref() {
        discard_blob(&state.media, old).await;
    }

    Ok(Json(StaffView::new(staff, &state.media)))
}
