use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use std::collections::BTreeMap;

/// Failure taxonomy shared by services and handlers.
///
/// Messages on user-facing variants are written for end users; the wrapped
/// `anyhow::Error` of `RemoteOperation` is only ever logged.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A field constraint was violated; blocks the submission.
    #[error("{message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, Vec<String>>,
    },

    /// No valid session accompanied the request.
    #[error("{0}")]
    Unauthenticated(String),

    /// The session user may not act on this record.
    #[error("{0}")]
    Forbidden(String),

    /// Required context is missing or the record is in the wrong state.
    #[error("{0}")]
    Precondition(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    /// The data store failed.
    #[error("remote operation failed: {0}")]
    RemoteOperation(#[from] anyhow::Error),

    /// The generative model or its secret could not be reached.
    #[error("{0}")]
    ExternalService(String),

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Single-field validation failure
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), vec![message.clone()]);
        AppError::Validation { message, fields }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Precondition(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::RemoteOperation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (field, field_errors) in errors.field_errors() {
            let messages = field_errors
                .iter()
                .map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
                .collect();
            fields.insert(field.to_string(), messages);
        }

        let message = fields
            .values()
            .flatten()
            .next()
            .cloned()
            .unwrap_or_else(|| "Invalid input".to_string());

        AppError::Validation { message, fields }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            AppError::Validation { message, fields } => json!({
                "error": message,
                "fields": fields,
            }),
            AppError::RemoteOperation(e) => {
                tracing::error!("Remote operation failed: {:#}", e);
                json!({ "error": "Something went wrong. Please try again." })
            }
            AppError::ExternalService(reason) => {
                tracing::warn!("External service failure: {}", reason);
                json!({ "error": reason })
            }
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
