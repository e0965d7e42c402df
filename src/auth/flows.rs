//! Login, refresh, revoke and the authenticated-request gate.

use axum::http::HeaderMap;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::bearer::{TokenKind, extract_bearer};
use super::errors::AuthError;
use super::refresh::generate_refresh_token;
use super::state::{HasAuthBackend, expires_after};
use crate::db::User;
use crate::password::{DUMMY_PASSWORD_HASH, verify_password};

/// Everything a successful login hands back to the client.
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub user: User,
    pub token: String,
    pub refresh_token: String,
}

/// Verify credentials and start a session.
///
/// Issues a session token and registers a fresh refresh token. An unknown
/// email and a wrong password both fail with [`AuthError::Unauthorized`],
/// and both pay for one Argon2 verification.
pub async fn login<S>(backend: &S, email: &str, password: &str) -> Result<LoginSession, AuthError>
where
    S: HasAuthBackend + Sync,
{
    let Some(user) = backend.db().users().get_by_email(email).await? else {
        // Result ignored: it is always a mismatch.
        let _ = verify_password(password, DUMMY_PASSWORD_HASH);
        info!("Login attempt for unknown email");
        return Err(AuthError::Unauthorized);
    };

    if !verify_password(password, &user.hashed_password)? {
        info!(user_id = %user.id, "Login attempt with wrong password");
        return Err(AuthError::Unauthorized);
    }

    let lifetimes = backend.lifetimes();
    let refresh_expires_at = expires_after(Utc::now(), lifetimes.refresh)?;
    let token = backend
        .jwt()
        .issue_session_token(user.id, lifetimes.session)?;

    let refresh_token = generate_refresh_token();
    backend
        .db()
        .refresh_tokens()
        .register(&refresh_token, user.id, refresh_expires_at)
        .await?;

    info!(user_id = %user.id, "Logged in");
    Ok(LoginSession {
        user,
        token,
        refresh_token,
    })
}

/// Exchange a refresh token for a new session token.
///
/// The refresh token must exist, be unrevoked and be unexpired. It is not
/// rotated: the same refresh token keeps working until it expires or is revoked.
pub async fn refresh_session<S>(backend: &S, refresh_token: &str) -> Result<String, AuthError>
where
    S: HasAuthBackend + Sync,
{
    let record = backend
        .db()
        .refresh_tokens()
        .get(refresh_token)
        .await?
        .ok_or(AuthError::NotFound)?;

    if !record.is_usable_at(Utc::now()) {
        if record.is_revoked() {
            warn!(user_id = %record.user_id, "Refresh attempted with a revoked token");
            return Err(AuthError::Revoked);
        }
        return Err(AuthError::TokenExpired);
    }

    let token = backend
        .jwt()
        .issue_session_token(record.user_id, backend.lifetimes().session)?;

    info!(user_id = %record.user_id, "Refreshed session token");
    Ok(token)
}

/// Revoke a refresh token. Succeeds whether or not it was already revoked,
/// or even known.
pub async fn revoke_refresh_token<S>(backend: &S, refresh_token: &str) -> Result<(), AuthError>
where
    S: HasAuthBackend + Sync,
{
    if backend.db().refresh_tokens().revoke(refresh_token).await? {
        info!("Refresh token revoked");
    }
    Ok(())
}

/// Resolve the session token in `headers` to the user it was issued to.
pub fn authenticate<S>(backend: &S, headers: &HeaderMap) -> Result<Uuid, AuthError>
where
    S: HasAuthBackend,
{
    let token = extract_bearer(headers, TokenKind::Session)?;
    backend.jwt().validate_session_token(token)
}
