//! Authentication configuration

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    /// Lifetime of issued tokens in seconds
    pub token_ttl_secs: u64,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            issuer: None,
            audience: None,
            token_ttl_secs: 3600,
        }
    }
}
