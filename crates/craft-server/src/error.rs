//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the unified error type for all API endpoints. It implements
//! `axum::response::IntoResponse` to produce structured JSON error responses
//! with appropriate HTTP status codes. Provider failures that carry their own
//! status are the exception: they are passed through verbatim.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use craft_storage::{FieldViolation, StorageError};
use serde::Serialize;

use crate::generator::GeneratorError;

/// Structured error detail in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code (e.g., "VALIDATION_FAILED").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional structured details (e.g., field violations).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API errors with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Input rejected before any write (422).
    #[error("validation failed")]
    ValidationFailed(Vec<FieldViolation>),

    /// A write was rejected by a storage constraint (500).
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// Internal server error (500).
    #[error("internal error: {0}")]
    InternalError(String),

    /// The generation provider answered with an error; status and body are
    /// relayed unchanged.
    #[error("upstream error: status {status}")]
    Upstream {
        status: StatusCode,
        body: serde_json::Value,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Upstream { status, body } => {
                return (status, axum::Json(body)).into_response();
            }
            ApiError::ValidationFailed(violations) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiErrorDetail {
                    code: "VALIDATION_FAILED".to_string(),
                    message: format!("{} validation error(s)", violations.len()),
                    details: serde_json::to_value(&violations).ok(),
                },
            ),
            ApiError::WriteFailed(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorDetail {
                    code: "WRITE_FAILED".to_string(),
                    message: msg,
                    details: None,
                },
            ),
            ApiError::InternalError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: msg,
                    details: None,
                },
            ),
        };

        let body = serde_json::json!({
            "success": false,
            "error": detail,
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Validation(violations) => ApiError::ValidationFailed(violations),
            err @ StorageError::ConstraintViolation { .. } => {
                ApiError::WriteFailed(err.to_string())
            }
            err => ApiError::InternalError(err.to_string()),
        }
    }
}

impl From<GeneratorError> for ApiError {
    fn from(err: GeneratorError) -> Self {
        match err {
            GeneratorError::Status { status, body } => match StatusCode::from_u16(status) {
                Ok(status) => ApiError::Upstream { status, body },
                Err(_) => ApiError::InternalError(format!(
                    "provider returned invalid status {}",
                    status
                )),
            },
            other => ApiError::InternalError(other.to_string()),
        }
    }
}
