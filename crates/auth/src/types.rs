//! Identity types resolved by the auth gate

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated caller, resolved per request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
}

impl Identity {
    pub fn new(user_id: Uuid, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }
}

/// A freshly signed token and its lifetime
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: u64,
}
