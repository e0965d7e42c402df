//! Session token (JWT) issuance and validation.
//!
//! Session tokens are stateless: validity is proven by the HS256 signature
//! and the `exp` claim alone. Nothing about them is stored.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{AuthError, expires_after};

/// Value of the `iss` claim on every token this server issues.
pub const ISSUER: &str = "chirpy";

/// The only algorithm accepted on validation.
const ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Issuer
    pub iss: String,
    /// Subject (user UUID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token ID, so two tokens issued in the same second still differ
    pub jti: String,
}

/// Signing keys for session tokens.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtConfig {
    /// Create a new JWT configuration with the given secret.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a session token for `user_id` that expires `ttl` from now.
    pub fn issue_session_token(&self, user_id: Uuid, ttl: Duration) -> Result<String, AuthError> {
        let now = Utc::now();
        let expires_at = expires_after(now, ttl)?;

        let claims = SessionClaims {
            iss: ISSUER.to_string(),
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        jsonwebtoken::encode(&Header::new(ALGORITHM), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "Failed to sign session token");
            AuthError::TokenIssue
        })
    }

    /// Validate a session token and return the user it was issued to.
    pub fn validate_session_token(&self, token: &str) -> Result<Uuid, AuthError> {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        let token_data =
            jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &validation)
                .map_err(|e| match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::TokenInvalid,
                })?;

        Uuid::parse_str(&token_data.claims.sub).map_err(|_| AuthError::TokenInvalid)
    }
}
