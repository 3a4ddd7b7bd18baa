//! Client error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response; `message` is the server's `message` field when present
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ClientError {
    /// HTTP status for `Api` errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
