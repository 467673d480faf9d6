use thiserror::Error;

use models::errors::ModelError;

/// REST-facing error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    BadRequest,
    Unauthorized,
    NotFound,
    MethodNotAllowed,
    Conflict,
    PayloadTooLarge,
    InternalServerError,
}

impl ErrorCode {
    pub fn status(self) -> u16 {
        match self {
            ErrorCode::BadRequest => 400,
            ErrorCode::Unauthorized => 401,
            ErrorCode::NotFound => 404,
            ErrorCode::MethodNotAllowed => 405,
            ErrorCode::Conflict => 409,
            ErrorCode::PayloadTooLarge => 413,
            ErrorCode::InternalServerError => 500,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ErrorCode::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self { Self::Db(e.to_string()) }
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn not_owner(entity: &str) -> Self { Self::BadRequest(format!("{} is not owned by the login member", entity)) }

    pub fn inactive(entity: &str) -> Self { Self::MethodNotAllowed(format!("{} is inactive", entity)) }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            ServiceError::Validation(_) | ServiceError::BadRequest(_) => ErrorCode::BadRequest,
            ServiceError::Model(ModelError::Validation(_)) => ErrorCode::BadRequest,
            ServiceError::NotFound(_) => ErrorCode::NotFound,
            ServiceError::MethodNotAllowed(_) => ErrorCode::MethodNotAllowed,
            ServiceError::PayloadTooLarge(_) => ErrorCode::PayloadTooLarge,
            ServiceError::Model(ModelError::Conflict(_)) => ErrorCode::Conflict,
            ServiceError::Storage(_) | ServiceError::Db(_) | ServiceError::Model(ModelError::Db(_)) => {
                ErrorCode::InternalServerError
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_to_rest_codes() {
        assert_eq!(ServiceError::not_found("post").error_code(), ErrorCode::NotFound);
        assert_eq!(ServiceError::not_owner("post").error_code(), ErrorCode::BadRequest);
        assert_eq!(ServiceError::inactive("post").error_code(), ErrorCode::MethodNotAllowed);
        assert_eq!(
            ServiceError::Model(ModelError::Validation("x".into())).error_code(),
            ErrorCode::BadRequest
        );
        assert_eq!(ServiceError::Db("down".into()).error_code(), ErrorCode::InternalServerError);
        assert_eq!(ServiceError::Model(ModelError::Conflict("dup".into())).error_code(), ErrorCode::Conflict);
        assert_eq!(ErrorCode::MethodNotAllowed.status(), 405);
        assert_eq!(ErrorCode::NotFound.as_str(), "NOT_FOUND");
    }
}
