//! Admin team member management

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use hearth_core::intake::{FieldReader, Submission, LONG_TEXT_MAX, TEXT_MAX};
use hearth_core::models::{NewTeamMember, PageRequest, TeamMemberUpdate};
use hearth_core::AppError;
use hearth_storage::BlobDirectory;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::HttpAppError;
use crate::handlers::not_found;
use crate::handlers::views::TeamMemberView;
use crate::state::AppState;
use crate::utils::upload::{discard_blob, read_multipart, store_upload, with_new_blob};

const PHOTO_FIELD: &str = "photo";
const MAX_ORDER: i64 = 1_000_000;

struct MemberFields {
    name: Option<String>,
    position: Option<String>,
    bio: Option<String>,
    sort_order: Option<i32>,
    is_active: Option<bool>,
}

fn read_fields(form: &Submission, creating: bool) -> Result<MemberFields, AppError> {
    let mut reader = FieldReader::new(form);
    let (name, position) = if creating {
        (
            reader.required_text("name", TEXT_MAX),
            reader.required_text("position", TEXT_MAX),
        )
    } else {
        (
            reader.optional_text("name", TEXT_MAX),
            reader.optional_text("position", TEXT_MAX),
        )
    };
    let bio = reader.optional_text("bio", LONG_TEXT_MAX);
    let sort_order = reader
        .integer("order", 0, MAX_ORDER)
        .and_then(|n| i32::try_from(n).ok());
    let is_active = reader.boolean("is_active");

    let errors = reader.finish();
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }
    Ok(MemberFields {
        name,
        position,
        bio,
        sort_order,
        is_active,
    })
}

#[utoipa::path(
    get,
    path = "/admin/team",
    tag = "team",
    params(PageRequest),
    responses((status = 200, description = "Team members, newest first")),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn list_members(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let members = state
        .db
        .team
        .list(page)
        .await?
        .map(|member| TeamMemberView::new(member, &state.media));
    Ok(Json(members))
}

#[utoipa::path(
    post,
    path = "/admin/team",
    tag = "team",
    request_body(content_type = "multipart/form-data", description = "name, position, bio, order, is_active and an optional photo"),
    responses(
        (status = 201, description = "Member created", body = TeamMemberView),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, multipart))]
pub async fn create_member(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let (form, photo) = read_multipart(multipart, PHOTO_FIELD).await?;
    let fields = read_fields(&form, true)?;
    let (Some(name), Some(position)) = (fields.name, fields.position) else {
        return Err(AppError::InvalidInput("Incomplete team member".to_string()).into());
    };

    let photo_path = match &photo {
        Some(file) => Some(store_upload(&state.media, BlobDirectory::Team, PHOTO_FIELD, file).await?),
        None => None,
    };

    let member = with_new_blob(
        &state.media,
        photo_path.as_deref(),
        state.db.team.create(NewTeamMember {
            name,
            position,
            bio: fields.bio,
            photo: photo_path.clone(),
            sort_order: fields.sort_order.unwrap_or(0),
            is_active: fields.is_active.unwrap_or(true),
        }),
    )
    .await?;

    tracing::info!(member_id = %member.id, has_photo = member.photo.is_some(), "Team member created");
    Ok((StatusCode::CREATED, Json(TeamMemberView::new(member, &state.media))))
}

#[utoipa::path(
    get,
    path = "/admin/team/{id}",
    tag = "team",
    params(("id" = Uuid, Path, description = "Team member ID")),
    responses(
        (status = 200, description = "Team member", body = TeamMemberView),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn get_member(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let member = state
        .db
        .team
        .get(id)
        .await?
        .ok_or_else(|| not_found("Team member"))?;
    Ok(Json(TeamMemberView::new(member, &state.media)))
}

#[utoipa::path(
    put,
    path = "/admin/team/{id}",
    tag = "team",
    params(("id" = Uuid, Path, description = "Team member ID")),
    request_body(content_type = "multipart/form-data", description = "Any of name, position, bio, order, is_active, photo"),
    responses(
        (status = 200, description = "Member updated", body = TeamMemberView),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, multipart))]
pub async fn update_member(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let current = state
        .db
        .team
        .get(id)
        .await?
        .ok_or_else(|| not_found("Team member"))?;

    let (form, photo) = read_multipart(multipart, PHOTO_FIELD).await?;
    let fields = read_fields(&form, false)?;

    let photo_path = match &photo {
        Some(file) => Some(store_upload(&state.media, BlobDirectory::Team, PHOTO_FIELD, file).await?),
        None => None,
    };

    // A sent-but-empty bio clears it; an absent one leaves it alone.
    let bio = if form.raw("bio").is_some() {
        Some(fields.bio)
    } else {
        None
    };
    let update = TeamMemberUpdate {
        name: fields.name,
        position: fields.position,
        bio,
        sort_order: fields.sort_order,
        is_active: fields.is_active,
        photo: photo_path.clone(),
    };
    let member = with_new_blob(&state.media, photo_path.as_deref(), async {
        state
            .db
            .team
            .update(id, update)
            .await?
            .ok_or_else(|| not_found("Team member"))
    })
    .await?;

    if photo_path.is_some() {
        if let Some(old) = current.photo.as_deref() {
            discard_blob(&state.media, old).await;
        }
    }

    tracing::info!(member_id = %member.id, photo_replaced = photo_path.is_some(), "Team member updated");
    Ok(Json(TeamMemberView::new(member, &state.media)))
}

#[utoipa::path(
    delete,
    path = "/admin/team/{id}",
    tag = "team",
    params(("id" = Uuid, Path, description = "Team member ID")),
    responses(
        (status = 204, description = "Member and photo deleted"),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn delete_member(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let member = state
        .db
        .team
        .get(id)
        .await?
        .ok_or_else(|| not_found("Team member"))?;

    if let Some(path) = member.photo.as_deref() {
        state.media.storage.delete(path).await?;
    }
    state.db.team.delete(id).await?;

    tracing::info!(member_id = %id, "Team member deleted");
    Ok(StatusCode::NO_CONTENT)
}
