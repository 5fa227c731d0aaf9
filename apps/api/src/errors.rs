use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::application::service::SubmissionError;
use crate::auth::AuthError;
use crate::persistence::PersistenceError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] AuthError),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

impl AppError {
    /// Joins every validation message into one envelope message.
    pub fn validation(messages: Vec<String>) -> Self {
        AppError::Validation(messages.join("; "))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::RoleNotAllowed { .. } => {
                AppError::Conflict("Only applicants can submit applications".to_string())
            }
            SubmissionError::UserNotFound { .. } => {
                AppError::Conflict("The signed-in user could not be found".to_string())
            }
            SubmissionError::AlreadySubmitted { .. } => {
                AppError::Conflict("You have already submitted an application".to_string())
            }
            SubmissionError::Persistence(e) => AppError::Persistence(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match &self {
            AppError::Validation(msg) => ("VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized(e) => {
                tracing::debug!("Unauthorized request: {e}");
                ("UNAUTHORIZED", "Authentication required".to_string())
            }
            AppError::Conflict(msg) => ("CONFLICT", msg.clone()),
            AppError::Persistence(e) => {
                tracing::error!("Persistence error: {e}");
                (
                    "PERSISTENCE_ERROR",
                    "Something went wrong, please try again later".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
