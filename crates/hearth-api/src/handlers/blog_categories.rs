use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use hearth_core::models::{BlogCategory, PageRequest};
use hearth_core::slug::slugify;
use hearth_core::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::{HttpAppError, ValidatedJson};
use crate::handlers::{not_found, unique_slug};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CategoryRequest {
    #[validate(length(min = 1, max = 255, message = "The name field is required."))]
    pub name: String,
}

/// Trimmed name, rejected when another category already uses it.
async fn checked_name(
    state: &AppState,
    request: CategoryRequest,
    except: Option<Uuid>,
) -> Result<String, AppError> {
    let name = request.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::field("name", "The name field is required."));
    }
    if state.db.categories.name_taken(&name, except).await? {
        return Err(AppError::field("name", "The name has already been taken."));
    }
    Ok(name)
}

async fn category_slug(state: &AppState, name: &str, except: Option<Uuid>) -> Result<String, AppError> {
    let categories = state.db.categories.clone();
    unique_slug(&slugify(name, "category"), |candidate| {
        let categories = categories.clone();
        async move { categories.slug_taken(&candidate, except).await }
    })
    .await
}

#[utoipa::path(
    get,
    path = "/admin/blog-categories",
    tag = "blog-categories",
    params(PageRequest),
    responses((status = 200, description = "Categories, newest first")),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    Ok(Json(state.db.categories.list(page).await?))
}

#[utoipa::path(
    post,
    path = "/admin/blog-categories",
    tag = "blog-categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = BlogCategory),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request))]
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CategoryRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate()?;
    let name = checked_name(&state, request, None).await?;
    let slug = category_slug(&state, &name, None).await?;

    let category = state.db.categories.create(&name, &slug).await?;
    tracing::info!(category_id = %category.id, slug = %category.slug, "Blog category created");
    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    get,
    path = "/admin/blog-categories/{id}",
    tag = "blog-categories",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category", body = BlogCategory),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let category = state
        .db
        .categories
        .get(id)
        .await?
        .ok_or_else(|| not_found("Blog category"))?;
    Ok(Json(category))
}

#[utoipa::path(
    put,
    path = "/admin/blog-categories/{id}",
    tag = "blog-categories",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category renamed; slug re-derived", body = BlogCategory),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request))]
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<CategoryRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate()?;
    let current = state
        .db
        .categories
        .get(id)
        .await?
        .ok_or_else(|| not_found("Blog category"))?;

    let name = checked_name(&state, request, Some(id)).await?;
    let slug = if name == current.name {
        current.slug
    } else {
        category_slug(&state, &name, Some(id)).await?
    };

    let category = state
        .db
        .categories
        .update(id, &name, &slug)
        .await?
        .ok_or_else(|| not_found("Blog category"))?;
    Ok(Json(category))
}

#[utoipa::path(
    delete,
    path = "/admin/blog-categories/{id}",
    tag = "blog-categories",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Category still has posts", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    if state.db.categories.get(id).await?.is_none() {
        return Err(not_found("Blog category").into());
    }

    let posts = state.db.categories.post_count(id).await?;
    if posts > 0 {
        return Err(AppError::field(
            "category",
            format!(
                "The category cannot be deleted while it still has {} post(s).",
                posts
            ),
        )
        .into());
    }

    state.db.categories.delete(id).await?;
    tracing::info!(category_id = %id, "Blog category deleted");
    Ok(StatusCode::NO_CONTENT)
}
