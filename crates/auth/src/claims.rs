//! JWT claims types

use serde::{Deserialize, Serialize};

/// Claims carried by tokens issued at login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Email
    pub email: String,
    /// Issued at
    pub iat: u64,
    /// Expires at
    pub exp: u64,
    /// Issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Audience
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}
