//! Identity resolution and token issuance
//!
//! `resolve_identity` is the pure credential check; `AuthGate` carries the
//! configuration into request state so extractors and the login handler can
//! reach it through `FromRef`.

use std::sync::Arc;

use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::jwt::{sign_jwt_token, validate_jwt_token};
use crate::types::{Identity, IssuedToken};

/// Verify a bearer credential and extract the caller's identity.
pub fn resolve_identity(credential: &str, config: &AuthConfig) -> Result<Identity, AuthError> {
    let claims = validate_jwt_token(credential, config)?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidUserId)?;

    Ok(Identity {
        user_id,
        email: claims.email,
    })
}

/// Auth gate shared through request state.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for AuthGate {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthGate {
    config: Arc<AuthConfig>,
}

impl AuthGate {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Resolve a raw bearer credential (without the `Bearer ` prefix)
    pub fn resolve(&self, credential: &str) -> Result<Identity, AuthError> {
        resolve_identity(credential, &self.config)
    }

    /// Sign a token for a user who just proved their credentials
    pub fn issue(&self, identity: &Identity) -> Result<IssuedToken, AuthError> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        let token = sign_jwt_token(
            &identity.user_id.to_string(),
            &identity.email,
            now,
            &self.config,
        )?;

        tracing::debug!(user_id = %identity.user_id, "Issued authentication token");

        Ok(IssuedToken {
            token,
            expires_in: self.config.token_ttl_secs,
        })
    }
}
