//! `Authorization: Bearer` extraction.

use axum::http::{HeaderMap, header::AUTHORIZATION};

use super::errors::AuthError;

const BEARER_PREFIX: &str = "Bearer ";

/// Shortest string accepted where a session token is expected. Signed
/// session tokens are well over this; refresh tokens are well under.
pub const MIN_SESSION_TOKEN_LEN: usize = 100;

/// Exact length of a refresh token (32 random bytes, hex encoded).
pub const REFRESH_TOKEN_LEN: usize = 64;

/// Which credential an endpoint expects in its bearer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Session,
    Refresh,
}

/// Pull the bearer token out of `headers` and check it has the shape of `kind`.
///
/// The shape check is a length heuristic only. It stops a refresh token
/// being sent where a session token belongs (and the reverse) before any
/// signature check or database lookup runs.
pub fn extract_bearer(headers: &HeaderMap, kind: TokenKind) -> Result<&str, AuthError> {
    let raw = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    let token = raw
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::MalformedHeader)?;

    if token.is_empty() {
        return Err(AuthError::EmptyToken);
    }

    let shape_ok = match kind {
        TokenKind::Session => token.len() >= MIN_SESSION_TOKEN_LEN,
        TokenKind::Refresh => token.len() == REFRESH_TOKEN_LEN,
    };
    if !shape_ok {
        return Err(AuthError::WrongTokenKind);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_refresh_token_in_refresh_slot() {
        let token = "a".repeat(REFRESH_TOKEN_LEN);
        let headers = headers_with(&format!("Bearer {}", token));

        assert_eq!(extract_bearer(&headers, TokenKind::Refresh).unwrap(), token);
    }

    #[test]
    fn test_refresh_token_in_session_slot() {
        let headers = headers_with(&format!("Bearer {}", "0f".repeat(32)));

        let result = extract_bearer(&headers, TokenKind::Session);
        assert!(matches!(result, Err(AuthError::WrongTokenKind)));
    }

    #[test]
    fn test_session_token_in_refresh_slot() {
        let headers = headers_with(&format!("Bearer {}", "x".repeat(150)));

        assert_eq!(
            extract_bearer(&headers, TokenKind::Session).unwrap().len(),
            150
        );
        let result = extract_bearer(&headers, TokenKind::Refresh);
        assert!(matches!(result, Err(AuthError::WrongTokenKind)));
    }

    #[test]
    fn test_missing_header() {
        let headers = HeaderMap::new();
        let result = extract_bearer(&headers, TokenKind::Session);
        assert!(matches!(result, Err(AuthError::MissingHeader)));
    }

    #[test]
    fn test_empty_token() {
        let headers = headers_with("Bearer ");
        let result = extract_bearer(&headers, TokenKind::Refresh);
        assert!(matches!(result, Err(AuthError::EmptyToken)));
    }

    #[test]
    fn test_wrong_scheme() {
        for value in ["Basic dXNlcjpwYXNz", "bearer abc", "Bearerabc"] {
            let headers = headers_with(value);
            let result = extract_bearer(&headers, TokenKind::Session);
            assert!(
                matches!(result, Err(AuthError::MalformedHeader)),
                "{value} should be malformed"
            );
        }
    }

    #[test]
    fn test_non_ascii_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xfftoken").unwrap(),
        );
        let result = extract_bearer(&headers, TokenKind::Session);
        assert!(matches!(result, Err(AuthError::MalformedHeader)));
    }
}
