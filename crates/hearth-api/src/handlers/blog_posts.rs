//! Admin blog post management.
//!
//! Create and update arrive as multipart bodies so a featured image can ride
//! along with the text fields. The image, when sent, is stored before the row is
//! written and the previous one is discarded only after the row points at the
//! new path.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use hearth_core::intake::{FieldReader, Submission, LONG_TEXT_MAX, TEXT_MAX};
use hearth_core::models::{BlogPostStatus, BlogPostUpdate, NewBlogPost, PageRequest};
use hearth_core::slug::slugify;
use hearth_core::{AppError, ValidationError};
use chrono::{DateTime, Utc};
use hearth_storage::BlobDirectory;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::HttpAppError;
use crate::handlers::views::BlogPostView;
use crate::handlers::{not_found, unique_slug};
use crate::state::AppState;
use crate::utils::upload::{discard_blob, read_multipart, store_upload, with_new_blob};

const IMAGE_FIELD: &str = "featured_image";
const CONTENT_MAX: usize = 100_000;

/// Text fields of a post form after validation. Every field is optional here;
/// creation checks the required ones separately.
struct PostFields {
    title: Option<String>,
    category_id: Option<Uuid>,
    excerpt: Option<String>,
    content: Option<String>,
    status: Option<BlogPostStatus>,
    published_at: Option<DateTime<Utc>>,
}

async fn read_fields(state: &AppState, form: &Submission, creating: bool) -> Result<PostFields, AppError> {
    let mut reader = FieldReader::new(form);
    let (title, excerpt, content) = if creating {
        (
            reader.required_text("title", TEXT_MAX),
            reader.required_text("excerpt", LONG_TEXT_MAX),
            reader.required_text("content", CONTENT_MAX),
        )
    } else {
        (
            reader.optional_text("title", TEXT_MAX),
            reader.optional_text("excerpt", LONG_TEXT_MAX),
            reader.optional_text("content", CONTENT_MAX),
        )
    };
    let category_id = reader.id("category_id", creating);
    let published_at = reader.timestamp("published_at");

    let status = match form.text("status") {
        None if creating => {
            reader.reject("status", "The status field is required.");
            None
        }
        None => None,
        Some(value) => match BlogPostStatus::from_str(value) {
            Ok(status) => Some(status),
            Err(_) => {
                reader.reject("status", "The selected status is invalid.");
                None
            }
        },
    };

    if let Some(id) = category_id {
        if state.db.categories.get(id).await?.is_none() {
            reader.reject("category_id", "The selected category is invalid.");
        }
    }

    let errors: ValidationError = reader.finish();
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    Ok(PostFields {
        title,
        category_id,
        excerpt,
        content,
        status,
        published_at,
    })
}

async fn post_slug(state: &AppState, title: &str, except: Option<Uuid>) -> Result<String, AppError> {
    let posts = state.db.posts.clone();
    unique_slug(&slugify(title, "post"), |candidate| {
        let posts = posts.clone();
        async move { posts.slug_taken(&candidate, except).await }
    })
    .await
}

#[utoipa::path(
    get,
    path = "/admin/blog-posts",
    tag = "blog-posts",
    params(PageRequest),
    responses((status = 200, description = "Every post, newest first")),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let posts = state
        .db
        .posts
        .list(page)
        .await?
        .map(|post| BlogPostView::new(post, &state.media));
    Ok(Json(posts))
}

#[utoipa::path(
    post,
    path = "/admin/blog-posts",
    tag = "blog-posts",
    request_body(content_type = "multipart/form-data", description = "title, category_id, excerpt, content, status and an optional featured_image or published_at (RFC 3339)"),
    responses(
        (status = 201, description = "Post created", body = BlogPostView),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, multipart))]
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let (form, image) = read_multipart(multipart, IMAGE_FIELD).await?;
    let fields = read_fields(&state, &form, true).await?;
    let (Some(title), Some(category_id), Some(excerpt), Some(content), Some(status)) = (
        fields.title,
        fields.category_id,
        fields.excerpt,
        fields.content,
        fields.status,
    ) else {
        return Err(AppError::InvalidInput("Incomplete blog post".to_string()).into());
    };

    let slug = post_slug(&state, &title, None).await?;
    let featured_image = match &image {
        Some(file) => Some(store_upload(&state.media, BlobDirectory::BlogFeatured, IMAGE_FIELD, file).await?),
        None => None,
    };

    let post = with_new_blob(
        &state.media,
        featured_image.as_deref(),
        state.db.posts.create(NewBlogPost {
            category_id,
            title,
            slug,
            excerpt,
            content,
            featured_image: featured_image.clone(),
            status,
            published_at: fields.published_at,
        }),
    )
    .await?;

    tracing::info!(post_id = %post.id, slug = %post.slug, status = %post.status, "Blog post created");
    Ok((StatusCode::CREATED, Json(BlogPostView::new(post, &state.media))))
}

#[utoipa::path(
    get,
    path = "/admin/blog-posts/{id}",
    tag = "blog-posts",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post", body = BlogPostView),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let post = state
        .db
        .posts
        .get(id)
        .await?
        .ok_or_else(|| not_found("Blog post"))?;
    Ok(Json(BlogPostView::new(post, &state.media)))
}

#[utoipa::path(
    put,
    path = "/admin/blog-posts/{id}",
    tag = "blog-posts",
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body(content_type = "multipart/form-data", description = "Any of title, category_id, excerpt, content, status, published_at, featured_image"),
    responses(
        (status = 200, description = "Post updated", body = BlogPostView),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, multipart))]
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let current = state
        .db
        .posts
        .get(id)
        .await?
        .ok_or_else(|| not_found("Blog post"))?;

    let (form, image) = read_multipart(multipart, IMAGE_FIELD).await?;
    let fields = read_fields(&state, &form, false).await?;

    let slug = match &fields.title {
        Some(title) if *title != current.title => Some(post_slug(&state, title, Some(id)).await?),
        _ => None,
    };
    let featured_image = match &image {
        Some(file) => Some(store_upload(&state.media, BlobDirectory::BlogFeatured, IMAGE_FIELD, file).await?),
        None => None,
    };

    let update = BlogPostUpdate {
        category_id: fields.category_id,
        title: fields.title,
        slug,
        excerpt: fields.excerpt,
        content: fields.content,
        status: fields.status,
        featured_image: featured_image.clone(),
        published_at: fields.published_at,
    };
    let post = with_new_blob(&state.media, featured_image.as_deref(), async {
        state
            .db
            .posts
            .update(id, update)
            .await?
            .ok_or_else(|| not_found("Blog post"))
    })
    .await?;

    if featured_image.is_some() {
        if let Some(old) = current.featured_image.as_deref() {
            discard_blob(&state.media, old).await;
        }
    }

    tracing::info!(post_id = %post.id, image_replaced = featured_image.is_some(), "Blog post updated");
    Ok(Json(BlogPostView::new(post, &state.media)))
}

#[utoipa::path(
    delete,
    path = "/admin/blog-posts/{id}",
    tag = "blog-posts",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Post and featured image deleted"),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let post = state
        .db
        .posts
        .get(id)
        .await?
        .ok_or_else(|| not_found("Blog post"))?;

    if let Some(path) = post.featured_image.as_deref() {
        state.media.storage.delete(path).await?;
    }
    state.db.posts.delete(id).await?;

    tracing::info!(post_id = %id, "Blog post deleted");
    Ok(StatusCode::NO_CONTENT)
}
