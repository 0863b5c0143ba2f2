use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use hearth_core::intake::Submission;
use hearth_core::AppError;

use crate::error::HttpAppError;

/// A public form body, urlencoded or JSON, flattened into a [`Submission`].
///
/// An empty body without a content type is an empty submission, so the
/// normalizer reports every required field.
#[derive(Debug, Clone)]
pub struct FormSubmission(pub Submission);

impl<S> FromRequest<S> for FormSubmission
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/json") {
            let Json(value) = Json::<serde_json::Value>::from_request(req, state).await?;
            return Ok(FormSubmission(Submission::from_json(&value)));
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state).await?;
            return Ok(FormSubmission(Submission::from_pairs(pairs)));
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        if body.is_empty() {
            return Ok(FormSubmission(Submission::new()));
        }
        Err(AppError::BadRequest(format!(
            "Unsupported content type '{}'; send a form or JSON body",
            content_type
        ))
        .into())
    }
}
