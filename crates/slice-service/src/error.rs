//! Error types for slice-service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use slice_core::{PortError, SliceError};
use thiserror::Error;

use crate::config::ConfigError;

/// Startup errors
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Backend wiring error: {0}")]
    Backend(#[from] PortError),
}

/// API-specific errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A backend provisioning step failed
    #[error("Backend failure: {0}")]
    BackendFailure(String),

    /// A backend provisioning step exceeded its deadline
    #[error("Backend timeout: {0}")]
    BackendTimeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<SliceError> for ApiError {
    fn from(err: SliceError) -> Self {
        let message = err.to_string();
        match err {
            _ if err.is_not_found() => ApiError::NotFound(message),
            SliceError::BackendTimeout { .. } => ApiError::BackendTimeout(message),
            _ if err.is_backend_failure() => ApiError::BackendFailure(message),
            _ => ApiError::Internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::BackendFailure(_) => (StatusCode::BAD_GATEWAY, "BACKEND_FAILURE"),
            ApiError::BackendTimeout(_) => (StatusCode::GATEWAY_TIMEOUT, "BACKEND_TIMEOUT"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;
