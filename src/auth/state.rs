//! Authentication state traits and macro.

use std::time::Duration;

use chrono::{DateTime, Datelike, TimeDelta, Utc};

use super::errors::AuthError;
use crate::db::Database;
use crate::jwt::JwtConfig;

/// Last year an expiry may fall in. Later years are written with a `+` sign
/// and no longer sort correctly against stored timestamps.
const LAST_EXPIRY_YEAR: i32 = 9999;

/// Default session token lifetime: 1 hour.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// Default refresh token lifetime: 60 days.
pub const DEFAULT_REFRESH_TTL: Duration = Duration::from_secs(60 * 24 * 60 * 60);

/// How long each kind of token stays valid after it is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub session: Duration,
    pub refresh: Duration,
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            session: DEFAULT_SESSION_TTL,
            refresh: DEFAULT_REFRESH_TTL,
        }
    }
}

/// The instant `ttl` after `now`.
///
/// Fails with [`AuthError::TokenIssue`] when the result overflows or lands
/// past [`LAST_EXPIRY_YEAR`].
pub(crate) fn expires_after(now: DateTime<Utc>, ttl: Duration) -> Result<DateTime<Utc>, AuthError> {
    TimeDelta::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .filter(|expiry| expiry.year() <= LAST_EXPIRY_YEAR)
        .ok_or_else(|| {
            tracing::error!(ttl_secs = ttl.as_secs(), "Token lifetime is out of range");
            AuthError::TokenIssue
        })
}

/// Trait for state types that provide what the authentication flows need.
pub trait HasAuthBackend {
    fn jwt(&self) -> &JwtConfig;
    fn db(&self) -> &Database;
    fn lifetimes(&self) -> TokenLifetimes;
}

/// Implement `HasAuthBackend` for state structs with the standard fields.
///
/// The struct must have these fields:
/// - `jwt: Arc<JwtConfig>`
/// - `db: Database`
/// - `lifetimes: TokenLifetimes`
#[macro_export]
macro_rules! impl_has_auth_backend {
    ($state_type:ty) => {
        impl $crate::auth::HasAuthBackend for $state_type {
            fn jwt(&self) -> &$crate::jwt::JwtConfig {
                &self.jwt
            }
            fn db(&self) -> &$crate::db::Database {
                &self.db
            }
            fn lifetimes(&self) -> $crate::auth::TokenLifetimes {
                self.lifetimes
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expires_after() {
        let now = Utc::now();
        assert_eq!(
            expires_after(now, DEFAULT_SESSION_TTL).unwrap(),
            now + TimeDelta::hours(1)
        );
        assert_eq!(
            expires_after(now, DEFAULT_REFRESH_TTL).unwrap(),
            now + TimeDelta::days(60)
        );
    }

    #[test]
    fn test_expires_after_rejects_unstorable_instants() {
        let now = Utc::now();
        let ten_thousand_years = Duration::from_secs(10_000 * 366 * 24 * 60 * 60);

        assert!(matches!(
            expires_after(now, ten_thousand_years),
            Err(AuthError::TokenIssue)
        ));
        assert!(matches!(
            expires_after(now, Duration::MAX),
            Err(AuthError::TokenIssue)
        ));
    }
}
