//! Route definitions for the Users domain

use axum::{routing::post, Router};

use super::handlers::users;
use super::middleware::UsersState;

pub const USERS_BASE_PATH: &str = "/api/user";

/// Users domain routes
pub fn routes() -> Router<UsersState> {
    Router::new()
        .route(&format!("{USERS_BASE_PATH}/signup"), post(users::signup))
        .route(&format!("{USERS_BASE_PATH}/login"), post(users::login))
}
