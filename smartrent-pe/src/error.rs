//! Error types for smartrent-pe
//!
//! Validation problems go back to the caller verbatim with status 400.
//! Anything else is logged and answered with a generic 500 body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use smartrent_common::api::{AttributeError, ErrorResponse};
use thiserror::Error;

/// Message returned for every 500 response
pub const PROCESSING_FAILED: &str = "failed to process the estimate";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<AttributeError> for ApiError {
    fn from(err: AttributeError) -> Self {
        match err {
            AttributeError::MissingField(_) => ApiError::BadRequest(err.to_string()),
            AttributeError::InvalidValue { .. } => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "Estimate request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_FAILED.to_string())
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
