//! Opaque session token generation and hashing.
//!
//! Raw tokens are handed to the client exactly once; the store only ever
//! sees the SHA-256 hash.

use anyhow::{Context, Result};
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

/// Generate a 32-byte random bearer token, URL-safe base64 encoded.
///
/// # Errors
/// Returns an error if the OS random source fails.
pub fn generate_access_token() -> Result<String> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate access token")?;
    Ok(Base64UrlUnpadded::encode_string(&bytes))
}

/// Hash a token for storage and lookup.
pub fn hash_access_token(token: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_token_decodes_to_32_bytes() {
        let decoded_len = generate_access_token()
            .ok()
            .and_then(|token| Base64UrlUnpadded::decode_vec(&token).ok())
            .map(|bytes| bytes.len());
        assert_eq!(decoded_len, Some(32));
    }

    #[test]
    fn token_hash_is_stable_and_distinct() {
        let first = hash_access_token("token");
        let second = hash_access_token("token");
        let other = hash_access_token("other");
        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(first.len(), 32);
    }

    #[test]
    fn tokens_are_unique() -> anyhow::Result<()> {
        let first = generate_access_token()?;
        let second = generate_access_token()?;
        assert_ne!(first, second);
        Ok(())
    }
}
