//! Opaque refresh token generation.

use rand::RngCore;

/// Entropy per refresh token, in bytes.
const REFRESH_TOKEN_BYTES: usize = 32;

/// Generate a new refresh token: 32 bytes from the thread CSPRNG, hex encoded.
///
/// Uniqueness is enforced by the primary key on `refresh_tokens.token`.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
