//! Error types for npai-api
//!
//! One taxonomy for every operation, mapped onto HTTP status codes and the
//! uniform `{status: "error", message}` response envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Convenience Result type using the npai-api Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for npai-api
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or out-of-range input
    #[error("{0}")]
    Validation(String),

    /// Operation conflicts with existing state (duplicate running session,
    /// duplicate favorite)
    #[error("{0}")]
    Conflict(String),

    /// Resource absent, or present but not owned by the caller
    #[error("{0}")]
    NotFound(String),

    /// Operation invalid for the current session status
    #[error("{0}")]
    InvalidState(String),

    /// Caller identity missing on an identity-requiring route
    #[error("Authentication required")]
    Unauthorized,

    /// Generator/LLM or database failure; raw error text is passed through
    #[error("{message}: {detail}")]
    Upstream { message: String, detail: String },
}

impl Error {
    /// Wrap an upstream failure with a caller-facing context message
    pub fn upstream(message: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Error::Upstream {
            message: message.into(),
            detail: err.to_string(),
        }
    }
}

impl From<npai_common::Error> for Error {
    fn from(err: npai_common::Error) -> Self {
        match err {
            npai_common::Error::NotFound(msg) => Error::NotFound(msg),
            npai_common::Error::InvalidInput(msg) => Error::Validation(msg),
            other => Error::upstream("Storage operation failed", other),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Validation(_) | Error::Conflict(_) | Error::InvalidState(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match self {
            Error::Upstream { message, detail } => Json(json!({
                "status": "error",
                "message": message,
                "error": detail,
            })),
            other => Json(json!({
                "status": "error",
                "message": other.to_string(),
            })),
        };

        (status, body).into_response()
    }
}
