//! Auth gate for the Postboard API
//!
//! Validates bearer tokens, resolves them to an [`Identity`], and issues
//! tokens on login. Axum extractors work with any state implementing
//! `FromRef<S>` for [`AuthGate`].

mod claims;
mod config;
mod error;
mod extractors;
mod gate;
mod jwt;
mod types;

pub use claims::TokenClaims;
pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::{AuthUser, MaybeAuthUser};
pub use gate::{resolve_identity, AuthGate};
pub use types::{Identity, IssuedToken};
