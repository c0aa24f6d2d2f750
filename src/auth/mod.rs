//! Credential verification, login flows and session token issuance.
//!
//! Two login paths exist deliberately: `/login1` validates credentials and
//! sends an OTP challenge, while `/login` is a direct path that issues a
//! bearer token without OTP confirmation. They are not wired together.

use anyhow::Result;
use chrono::{Duration, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::otp::OtpManager;
use crate::store::{Session, SessionStore, User, UserStore};

pub mod password;
pub mod token;

/// Default lifetime for issued session tokens.
pub const DEFAULT_SESSION_TTL_SECONDS: i64 = 86_400;

#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown email or wrong password on the direct login path.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Store or hashing failure; mapped to 500 at the gateway boundary.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// A freshly issued bearer token. The raw value exists only here and in
/// the response to the client.
#[derive(Clone, Debug)]
pub struct SessionToken {
    pub access_token: String,
}

/// New-user registration payload, pre-hash.
#[derive(Clone, Debug)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: String,
    pub address: String,
}

#[derive(Clone)]
pub struct AuthManager {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    otp: OtpManager,
    session_ttl_seconds: i64,
}

impl AuthManager {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        otp: OtpManager,
        session_ttl_seconds: i64,
    ) -> Self {
        Self {
            users,
            sessions,
            otp,
            session_ttl_seconds,
        }
    }

    #[must_use]
    pub fn otp(&self) -> &OtpManager {
        &self.otp
    }

    /// Hash the password and upsert the user record. Registering an
    /// existing email overwrites it (last-write-wins).
    ///
    /// # Errors
    /// Returns an error if hashing or the store write fails.
    pub async fn register(&self, registration: Registration) -> Result<()> {
        let password_hash = password::hash_password(&registration.password)?;
        self.users
            .upsert(User {
                email: registration.email,
                password_hash,
                name: registration.name,
                phone: registration.phone,
                address: registration.address,
            })
            .await
    }

    /// # Errors
    /// Returns an error if the store read fails.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.users.list_all().await
    }

    /// Verify an email/password pair against the credential store.
    ///
    /// An unknown email is a clean false, never a failure.
    ///
    /// # Errors
    /// Returns an error if the store read or hash parsing fails.
    pub async fn check_credentials(&self, email: &str, password: &str) -> Result<bool> {
        let Some(user) = self.users.find_by_email(email).await? else {
            return Ok(false);
        };
        password::verify_password(password, &user.password_hash)
    }

    /// First phase of the OTP-gated login: on valid credentials issue a
    /// challenge for out-of-band delivery and return true. Invalid
    /// credentials return false with no side effect.
    ///
    /// # Errors
    /// Returns an error if a store operation fails.
    pub async fn authenticate_and_challenge(&self, email: &str, password: &str) -> Result<bool> {
        if !self.check_credentials(email, password).await? {
            return Ok(false);
        }
        self.otp.issue(email).await?;
        Ok(true)
    }

    /// Direct login: verify credentials and issue an opaque bearer token
    /// bound to the identity. Does not require prior OTP verification.
    ///
    /// # Errors
    /// `AuthError::InvalidCredentials` on mismatch, `AuthError::Internal`
    /// on store failure.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionToken, AuthError> {
        if !self.check_credentials(email, password).await? {
            debug!(email, "direct login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = token::generate_access_token()?;
        let token_hash = token::hash_access_token(&access_token);
        self.sessions
            .insert(
                token_hash,
                Session {
                    email: email.to_string(),
                    expires_at: Utc::now() + Duration::seconds(self.session_ttl_seconds),
                },
            )
            .await?;

        Ok(SessionToken { access_token })
    }

    /// Resolve a bearer token to its session, if live.
    ///
    /// # Errors
    /// Returns an error if the store read fails.
    pub async fn authenticate_token(&self, access_token: &str) -> Result<Option<Session>> {
        let token_hash = token::hash_access_token(access_token);
        self.sessions.find_by_hash(&token_hash).await
    }

    /// Issue a password-reset challenge without confirming the account
    /// exists, so responses carry no user-enumeration signal.
    ///
    /// # Errors
    /// Returns an error if the store write fails.
    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        self.otp.issue(email).await?;
        Ok(())
    }
}
