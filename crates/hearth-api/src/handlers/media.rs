use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use hearth_core::AppError;
use hearth_storage::BlobDirectory;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::{read_multipart, store_upload};

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize, ToSchema)]
pub struct MediaUploadResponse {
    pub url: String,
    pub path: String,
}

/// Inline image for the blog editor. The returned URL is embedded in post
/// content, so the blob has no owning row.
#[utoipa::path(
    post,
    path = "/admin/media",
    tag = "media",
    request_body(content_type = "multipart/form-data", description = "Image in the `file` field"),
    responses(
        (status = 201, description = "Image stored", body = MediaUploadResponse),
        (status = 422, description = "Missing or rejected file", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, multipart))]
pub async fn upload_media(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let (_, file) = read_multipart(multipart, FILE_FIELD).await?;
    let file = file.ok_or_else(|| AppError::field(FILE_FIELD, "The file field is required."))?;

    let path = store_upload(&state.media, BlobDirectory::BlogImages, FILE_FIELD, &file).await?;
    let url = state.media.storage.url(&path);
    tracing::info!(path = %path, size = file.data.len(), "Editor image uploaded");

    Ok((StatusCode::CREATED, Json(MediaUploadResponse { url, path })))
}
