use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::db::StoreError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Every failure a handler can surface. Rendered as the
/// `{success: false, message, error?}` envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{message}")]
    MalformedResponse { message: String, cause: String },
    #[error("{message}")]
    Generation { message: String, cause: String },
    #[error("{message}")]
    Persistence { message: String, cause: String },
    #[error("{message}")]
    Email { message: String, cause: String },
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn persistence(message: impl Into<String>, err: impl std::fmt::Display) -> Self {
        ApiError::Persistence {
            message: message.into(),
            cause: err.to_string(),
        }
    }

    /// Store failures are server errors, except ids that could never match.
    pub fn store(message: impl Into<String>, err: StoreError) -> Self {
        match err {
            StoreError::InvalidId(_) => ApiError::BadRequest(err.to_string()),
            other => ApiError::persistence(message, other),
        }
    }

    fn cause(&self) -> Option<&str> {
        match self {
            ApiError::MalformedResponse { cause, .. }
            | ApiError::Generation { cause, .. }
            | ApiError::Persistence { cause, .. }
            | ApiError::Email { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::BadRequest(_)
            | ApiError::MalformedResponse { .. }
            | ApiError::Generation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Persistence { .. } | ApiError::Email { .. } | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            success: false,
            message: self.to_string(),
            error: self.cause().map(str::to_string),
        })
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::store("Database operation failed", err)
    }
}
