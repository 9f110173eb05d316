//! Client error types

use thiserror::Error;

/// Errors returned by [`crate::ApiClient`]
#[derive(Error, Debug)]
pub enum ClientError {
    /// The server answered with a non-success status
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request never produced a usable response (connect, timeout, decode)
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(err) => err.status().map(|s| s.as_u16()),
        }
    }
}
