//! User entity

use serde::Serialize;
use uuid::Uuid;

/// A registered account. The password hash never leaves the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Fields required to register an account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
}

/// Emails are compared case-insensitively and stored trimmed.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
