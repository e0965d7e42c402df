//! Authentication error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Every way an authentication step can fail.
///
/// The variants stay distinct for logging and tests. The HTTP response
/// collapses them so a client cannot tell a revoked token from an expired
/// or forged one, or an unknown email from a wrong password.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hashing(argon2::password_hash::Error),
    #[error("incorrect email or password")]
    Unauthorized,
    #[error("invalid token")]
    TokenInvalid,
    #[error("token expired")]
    TokenExpired,
    #[error("authorization header missing")]
    MissingHeader,
    #[error("authorization header is not a bearer credential")]
    MalformedHeader,
    #[error("bearer token is empty")]
    EmptyToken,
    #[error("bearer token has the wrong shape for this endpoint")]
    WrongTokenKind,
    #[error("refresh token not found")]
    NotFound,
    #[error("refresh token revoked")]
    Revoked,
    #[error("token could not be issued")]
    TokenIssue,
    #[error("storage error: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Hashing(_) | AuthError::TokenIssue | AuthError::Persistence(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            AuthError::Hashing(_) | AuthError::TokenIssue | AuthError::Persistence(_) => {
                "Internal server error"
            }
            AuthError::Unauthorized => "Incorrect email or password",
            AuthError::MissingHeader | AuthError::MalformedHeader | AuthError::EmptyToken => {
                "Not authenticated"
            }
            AuthError::TokenInvalid
            | AuthError::TokenExpired
            | AuthError::WrongTokenKind
            | AuthError::NotFound
            | AuthError::Revoked => "Invalid or expired token",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: &'static str,
        }

        match &self {
            AuthError::Hashing(_) | AuthError::TokenIssue | AuthError::Persistence(_) => {
                tracing::error!(error = %self, "Authentication failed")
            }
            _ => tracing::debug!(reason = %self, "Authentication rejected"),
        }

        (
            self.status_code(),
            Json(ErrorResponse {
                error: self.message(),
            }),
        )
            .into_response()
    }
}
