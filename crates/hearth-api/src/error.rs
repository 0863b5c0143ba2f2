//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Anything that converts
//! into [`AppError`] can be propagated with `?` and renders consistently (status,
//! body, logging).
//!
//! Public form endpoints use [`FormError`] instead, which renders validation
//! failures as `{message, errors, old}` so the page can be redrawn with the
//! visitor's input.

use axum::{
    extract::rejection::{FormRejection, JsonRejection},
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hearth_core::intake::Submission;
use hearth_core::{AppError, ErrorMetadata, LogLevel, ValidationError};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
    /// Field name to message, for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, String>>,
}

/// Wrapper so `IntoResponse` can be implemented for the core error type.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        HttpAppError(AppError::Validation(err))
    }
}

impl From<validator::ValidationErrors> for HttpAppError {
    fn from(err: validator::ValidationErrors) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<hearth_storage::StorageError> for HttpAppError {
    fn from(err: hearth_storage::StorageError) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

impl From<FormRejection> for HttpAppError {
    fn from(rejection: FormRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid form body: {}",
            rejection.body_text()
        )))
    }
}

/// JSON body extractor that answers malformed bodies with [`ErrorResponse`].
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state).await?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

pub(crate) fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;
        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let hide_details = is_production_env() || app_error.is_sensitive();
        let body = ErrorResponse {
            error: app_error.client_message(),
            details: (!hide_details).then(|| app_error.detailed_message()),
            error_type: (!hide_details).then(|| app_error.error_type().to_string()),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
            errors: app_error.field_errors().map(|e| e.as_map().clone()),
        };

        (status, Json(body)).into_response()
    }
}

/// Body of a rejected public form.
#[derive(Debug, Serialize, ToSchema)]
pub struct FormErrorResponse {
    pub message: String,
    pub errors: BTreeMap<String, String>,
    /// The submitted values, echoed back for re-rendering
    #[schema(value_type = Object)]
    pub old: serde_json::Value,
}

/// Failure of a public form submission.
#[derive(Debug)]
pub enum FormError {
    Invalid {
        errors: ValidationError,
        old: Submission,
    },
    Failed(HttpAppError),
}

impl FormError {
    pub fn invalid(errors: ValidationError, old: &Submission) -> Self {
        FormError::Invalid {
            errors,
            old: old.clone(),
        }
    }
}

impl From<HttpAppError> for FormError {
    fn from(err: HttpAppError) -> Self {
        FormError::Failed(err)
    }
}

impl From<AppError> for FormError {
    fn from(err: AppError) -> Self {
        FormError::Failed(HttpAppError(err))
    }
}

impl IntoResponse for FormError {
    fn into_response(self) -> Response {
        match self {
            FormError::Invalid { errors, old } => {
                tracing::debug!(fields = errors.len(), "Form submission rejected");
                let body = FormErrorResponse {
                    message: AppError::Validation(ValidationError::new()).client_message(),
                    errors: errors.as_map().clone(),
                    old: old.to_json(),
                };
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
            FormError::Failed(err) => err.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_error_carries_field_map() {
        let err = HttpAppError(AppError::field("category", "The category still has posts."));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["errors"]["category"], "The category still has posts.");
    }

    #[tokio::test]
    async fn test_storage_error_hides_details() {
        let err = HttpAppError(AppError::Storage("disk full at /srv/storage".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["code"], "STORAGE_ERROR");
        assert!(body.get("details").is_none());
        assert!(body.get("errors").is_none());
    }

    #[tokio::test]
    async fn test_form_error_echoes_old_values() {
        let old = Submission::from_pairs([("name", "Maria"), ("email", "not-an-email")]);
        let errors = ValidationError::single("email", "The email must be a valid email address.");
        let response = FormError::invalid(errors, &old).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["message"], "The given data was invalid.");
        assert_eq!(body["old"]["name"], "Maria");
        assert!(body["errors"]["email"].is_string());
    }
}
