//! Password hashing with Argon2id.
//!
//! Records store PHC-formatted hash strings; verification goes through the
//! `password-hash` verifier, so credential comparison never touches raw
//! string equality.

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

/// Hash a password using Argon2id with a fresh random salt.
///
/// # Errors
/// Returns an error if hashing fails.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| anyhow!("failed to hash password: {err}"))
}

/// Verify a password against a stored PHC hash string.
///
/// A wrong password is `Ok(false)`; only a malformed stored hash is an
/// error.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|err| anyhow!("invalid password hash: {err}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() -> Result<()> {
        let hash = hash_password("pw1")?;
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("pw1", &hash)?);
        assert!(!verify_password("pw2", &hash)?);
        Ok(())
    }

    #[test]
    fn same_password_hashes_differently() -> Result<()> {
        let first = hash_password("pw1")?;
        let second = hash_password("pw1")?;
        assert_ne!(first, second);
        assert!(verify_password("pw1", &second)?);
        Ok(())
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("pw1", "not-a-phc-string").is_err());
    }
}
