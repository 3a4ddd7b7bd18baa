//! User account handlers
//!
//! - POST /api/user/signup - register an account
//! - POST /api/user/login  - exchange credentials for a bearer token

use axum::{extract::State, http::StatusCode, Json};
use postboard_auth::Identity;
use postboard_common::{Error, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::UsersState;
use crate::domain::entities::{normalize_email, NewUser, User};
use crate::domain::password::{hash_password, verify_password};

/// Message for every failed login, whatever the cause
const AUTH_FAILED: &str = "Auth failed";

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: &'static str,
    pub result: User,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: u64,
    pub user_id: Uuid,
}

/// POST /api/user/signup
pub async fn signup(
    State(state): State<UsersState>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>)> {
    let email = normalize_email(&req.email);
    let password_hash = run_blocking(move || hash_password(&req.password)).await?;

    let user = state
        .users
        .create(NewUser {
            email,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            Error::Conflict(_) => Error::Conflict("Email is already registered".to_string()),
            other => other,
        })?;

    tracing::info!(user_id = %user.id, "User signed up");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created!",
            result: user,
        }),
    ))
}

/// POST /api/user/login
pub async fn login(
    State(state): State<UsersState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let email = normalize_email(&req.email);

    let Some(user) = state.users.find_by_email(&email).await? else {
        tracing::debug!("Login attempt for unknown email");
        return Err(Error::Authentication(AUTH_FAILED.to_string()));
    };

    let stored_hash = user.password_hash.clone();
    let matches = run_blocking(move || verify_password(&req.password, &stored_hash)).await?;
    if !matches {
        tracing::debug!(user_id = %user.id, "Login attempt with wrong password");
        return Err(Error::Authentication(AUTH_FAILED.to_string()));
    }

    let issued = state
        .auth
        .issue(&Identity::new(user.id, user.email))
        .map_err(|e| Error::Internal(e.to_string()))?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        token: issued.token,
        expires_in: issued.expires_in,
        user_id: user.id,
    }))
}

/// Argon2 is CPU-bound; keep it off the async workers.
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Internal(format!("Password task failed: {}", e)))?
}
