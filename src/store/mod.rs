//! Keyed storage boundaries for users, OTP challenges and sessions.
//!
//! The managers depend on these traits only; production wires in the
//! Postgres implementation while tests use the in-memory double.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// User identity record, keyed by email.
///
/// `password_hash` is an argon2id PHC string; raw passwords are never
/// persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// Outstanding one-time passcode for an email. At most one per email.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OtpChallenge {
    pub email: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

/// Issued session, keyed by the SHA-256 hash of the raw token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

/// Raw persistence boundary for user records. No validation happens here.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert or overwrite the record keyed by `user.email`.
    async fn upsert(&self, user: User) -> Result<()>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn list_all(&self) -> Result<Vec<User>>;
}

/// Persistence boundary for OTP challenges.
///
/// `upsert` must atomically replace any existing challenge for the same
/// email, and `consume` must atomically delete-if-matched; the managers
/// rely on that to avoid the read-modify-write race between concurrent
/// issuance and validation.
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Replace-if-exists-else-insert, keyed by `challenge.email`.
    async fn upsert(&self, challenge: OtpChallenge) -> Result<()>;

    async fn find_by_email(&self, email: &str) -> Result<Option<OtpChallenge>>;

    /// Delete the challenge iff `code` matches and it has not expired.
    /// Returns whether a challenge was consumed.
    async fn consume(&self, email: &str, code: &str) -> Result<bool>;

    /// No-op when no challenge exists for `email`.
    async fn delete_by_email(&self, email: &str) -> Result<()>;
}

/// Persistence boundary for issued session tokens. Only hashes are stored.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, token_hash: Vec<u8>, session: Session) -> Result<()>;

    /// Resolve a token hash to its session, ignoring expired records.
    async fn find_by_hash(&self, token_hash: &[u8]) -> Result<Option<Session>>;
}
