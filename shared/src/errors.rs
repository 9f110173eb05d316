//! Error types for the College Admin application

use thiserror::Error;

/// Authentication error types
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not authenticated. Please log in.")]
    MissingToken,

    #[error("Invalid or expired token. Please log in again.")]
    InvalidToken,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("You do not have permission to perform this action")]
    Forbidden,

    #[error("User not found")]
    UserNotFound,
}

impl AuthError {
    /// HTTP status code the error is reported with
    pub fn status(&self) -> u16 {
        match self {
            AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::NotAuthenticated => 401,
            AuthError::Forbidden => 403,
            AuthError::UserNotFound => 404,
        }
    }
}
