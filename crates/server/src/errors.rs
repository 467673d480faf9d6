use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{debug, error};

use service::errors::{ErrorCode, ServiceError};
use service::member::errors::AuthError;

/// Error body returned by every handler: `{"code": "NOT_FOUND", "message": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self { Self::new(ErrorCode::BadRequest, message) }

    pub fn unauthorized(message: impl Into<String>) -> Self { Self::new(ErrorCode::Unauthorized, message) }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.code.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self { Self::new(e.error_code(), e.to_string()) }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self { Self::new(e.error_code(), e.to_string()) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(code = self.code.as_str(), error = %self.message, "request failed");
        } else {
            debug!(code = self.code.as_str(), error = %self.message, "request rejected");
        }
        (status, Json(serde_json::json!({"code": self.code.as_str(), "message": self.message}))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
}
