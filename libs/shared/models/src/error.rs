use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced at the HTTP boundary. Every variant renders as the
/// uniform `{"message": ...}` JSON envelope.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store error: {message}: {cause}")]
    Store { message: String, cause: String },
}

impl AppError {
    pub fn not_found() -> Self {
        AppError::NotFound("Not Found".to_string())
    }

    pub fn store(message: impl Into<String>, cause: impl ToString) -> Self {
        AppError::Store {
            message: message.into(),
            cause: cause.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            AppError::Store { message, cause } => {
                tracing::error!("Error: {}: {}: {}", status, message, cause);
                json!({ "message": message, "error": cause })
            }
            AppError::NotFound(message)
            | AppError::BadRequest(message)
            | AppError::ValidationError(message)
            | AppError::MalformedInput(message)
            | AppError::Conflict(message) => {
                tracing::warn!("Error: {}: {}", status, message);
                json!({ "message": message })
            }
        };

        (status, Json(body)).into_response()
    }
}
