use thiserror::Error;

use crate::errors::ErrorCode;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("member already exists")]
    Conflict,
    #[error("member not found")]
    NotFound,
    #[error("invalid credentials")]
    Unauthorized,
    #[error("hashing error: {0}")]
    HashError(String),
    #[error("token error: {0}")]
    TokenError(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl AuthError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            AuthError::Validation(_) => ErrorCode::BadRequest,
            AuthError::Conflict => ErrorCode::Conflict,
            AuthError::NotFound | AuthError::Unauthorized | AuthError::TokenError(_) => ErrorCode::Unauthorized,
            AuthError::HashError(_) | AuthError::Repository(_) => ErrorCode::InternalServerError,
        }
    }
}
