//! Application error handling
//!
//! Every failure leaving the HTTP layer is turned into the uniform
//! `{status, message}` body here.

use crate::config::AppConfig;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use college_admin_shared::{AuthError, ErrorBody};
use std::any::Any;
use thiserror::Error;
use tracing::error;

/// Message returned for 500s in production
const GENERIC_INTERNAL_MESSAGE: &str = "Something went wrong";

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let message = err.to_string();
        match err.status() {
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            _ => ApiError::Unauthorized(message),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .collect::<Vec<_>>()
            .join(", ");
        ApiError::BadRequest(if message.is_empty() {
            "Invalid request".to_string()
        } else {
            message
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg) => msg,
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                if AppConfig::is_production() {
                    GENERIC_INTERNAL_MESSAGE.to_string()
                } else {
                    err.to_string()
                }
            }
        };

        (status, Json(ErrorBody::new(status.as_u16(), message))).into_response()
    }
}

/// Turn a handler panic into a 500 response
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    ApiError::Internal(anyhow::anyhow!("handler panicked: {}", detail)).into_response()
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
