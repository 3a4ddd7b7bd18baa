//! JWT validation, signing, and token extraction helpers

use axum::http::HeaderValue;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::claims::TokenClaims;
use crate::config::AuthConfig;
use crate::error::AuthError;

/// Validate a token signed with the configured secret
pub(crate) fn validate_jwt_token(
    token: &str,
    config: &AuthConfig,
) -> Result<TokenClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);

    if let Some(aud) = &config.audience {
        validation.set_audience(&[aud]);
    } else {
        validation.validate_aud = false;
    }

    if let Some(iss) = &config.issuer {
        validation.set_issuer(&[iss]);
    }

    let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_ref());

    let token_data = decode::<TokenClaims>(token, &decoding_key, &validation).map_err(|e| {
        tracing::debug!(error = %e, "JWT validation failed");
        AuthError::InvalidToken
    })?;

    Ok(token_data.claims)
}

/// Sign claims for `sub`/`email`, valid for `config.token_ttl_secs` from `now`
pub(crate) fn sign_jwt_token(
    sub: &str,
    email: &str,
    now: u64,
    config: &AuthConfig,
) -> Result<String, AuthError> {
    let claims = TokenClaims {
        sub: sub.to_string(),
        email: email.to_string(),
        iat: now,
        exp: now + config.token_ttl_secs,
        iss: config.issuer.clone(),
        aud: config.audience.clone(),
    };

    let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_ref());
    encode(&Header::new(Algorithm::HS256), &claims, &encoding_key).map_err(|e| {
        tracing::error!(error = %e, "JWT signing failed");
        AuthError::TokenIssueFailed
    })
}

/// Extract bearer token from Authorization header
pub(crate) fn extract_bearer_token(header: &HeaderValue) -> Result<String, AuthError> {
    let header_str = header
        .to_str()
        .map_err(|_| AuthError::InvalidAuthorizationFormat)?;

    match header_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(AuthError::InvalidAuthorizationFormat),
    }
}
