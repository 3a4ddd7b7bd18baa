//! Authentication errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Authentication error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("authorization header missing")]
    MissingAuthorization,
    #[error("authorization header is not a bearer credential")]
    InvalidAuthorizationFormat,
    #[error("token is invalid or expired")]
    InvalidToken,
    #[error("token subject is not a user id")]
    InvalidUserId,
    #[error("token could not be signed")]
    TokenIssueFailed,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::MissingAuthorization => (
                StatusCode::UNAUTHORIZED,
                "MISSING_AUTHORIZATION",
                "You are not authenticated!",
            ),
            AuthError::InvalidAuthorizationFormat => (
                StatusCode::UNAUTHORIZED,
                "INVALID_AUTHORIZATION",
                "Invalid authorization header format",
            ),
            AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid or expired token",
            ),
            AuthError::InvalidUserId => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid user ID in token",
            ),
            AuthError::TokenIssueFailed => {
                tracing::error!("Failed to sign authentication token");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "AUTH_ERROR",
                    "Authentication failed",
                )
            }
        };

        let body = Json(json!({
            "message": message,
            "code": code,
        }));

        (status, body).into_response()
    }
}
