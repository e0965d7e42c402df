//! Axum extractors for authentication.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use super::bearer::{TokenKind, extract_bearer};
use super::errors::AuthError;
use super::flows::authenticate;
use super::state::HasAuthBackend;

/// Extractor for endpoints that require a valid session token.
/// Yields the authenticated user's ID.
pub struct SessionAuth(pub Uuid);

impl<S> FromRequestParts<S> for SessionAuth
where
    S: HasAuthBackend + Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        authenticate(state, &parts.headers).map(SessionAuth)
    }
}

/// Extractor for the refresh token presented to `/refresh` and `/revoke`.
/// Only checks the header shape; the flows do the database lookup.
pub struct RefreshBearer(pub String);

impl<S> FromRequestParts<S> for RefreshBearer
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract_bearer(&parts.headers, TokenKind::Refresh)
            .map(|token| RefreshBearer(token.to_string()))
    }
}
