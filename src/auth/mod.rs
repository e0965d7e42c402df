//! Authentication: bearer extraction, refresh tokens and the login/refresh/revoke flows.
//!
//! Two credentials circulate. Session tokens are short-lived signed JWTs
//! (see [`crate::jwt`]) that are never stored. Refresh tokens are opaque
//! 64-character hex strings tracked in the database with an expiry and a
//! revocation timestamp. Both travel as `Authorization: Bearer <token>`.

mod bearer;
mod errors;
mod extractors;
mod flows;
mod refresh;
mod state;

pub use bearer::{MIN_SESSION_TOKEN_LEN, REFRESH_TOKEN_LEN, TokenKind, extract_bearer};
pub use errors::AuthError;
pub use extractors::{RefreshBearer, SessionAuth};
pub use flows::{LoginSession, authenticate, login, refresh_session, revoke_refresh_token};
pub use refresh::generate_refresh_token;
pub use state::{HasAuthBackend, TokenLifetimes};
pub(crate) use state::expires_after;
