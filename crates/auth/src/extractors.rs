//! Axum extractors for authentication
//!
//! Generic over any state `S` where `AuthGate: FromRef<S>`.
//! This is axum's idiomatic nested-state pattern.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::AuthError;
use crate::gate::AuthGate;
use crate::jwt::extract_bearer_token;
use crate::types::Identity;

/// Authenticated user extractor. Rejects with 401 before the handler runs.
#[derive(Debug)]
pub struct AuthUser(pub Identity);

impl<S> FromRequestParts<S> for AuthUser
where
    AuthGate: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let gate = AuthGate::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthorization)?;

        let token = extract_bearer_token(auth_header)?;
        let identity = gate.resolve(&token)?;

        Ok(AuthUser(identity))
    }
}

/// Optional identity extractor.
///
/// No `Authorization` header yields `None`; a header that is present but
/// does not resolve is still rejected with 401.
#[derive(Debug)]
pub struct MaybeAuthUser(pub Option<Identity>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    AuthGate: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(AUTHORIZATION) {
            return Ok(MaybeAuthUser(None));
        }

        let AuthUser(identity) = AuthUser::from_request_parts(parts, state).await?;
        Ok(MaybeAuthUser(Some(identity)))
    }
}
