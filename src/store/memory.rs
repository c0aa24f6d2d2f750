//! In-memory store used by tests and local development.
//!
//! A single `MemoryStore` implements all three store traits so one
//! instance can back the whole gateway. Each map is guarded by its own
//! `RwLock`; upsert and consume run under the write lock, which gives the
//! atomic replace / delete-if-match semantics the managers require.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{OtpChallenge, OtpStore, Session, SessionStore, User, UserStore};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>,
    otps: RwLock<HashMap<String, OtpChallenge>>,
    sessions: RwLock<HashMap<Vec<u8>, Session>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn upsert(&self, user: User) -> Result<()> {
        self.users.write().await.insert(user.email.clone(), user);
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        // Stable output for callers and tests.
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }
}

#[async_trait]
impl OtpStore for MemoryStore {
    async fn upsert(&self, challenge: OtpChallenge) -> Result<()> {
        self.otps
            .write()
            .await
            .insert(challenge.email.clone(), challenge);
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<OtpChallenge>> {
        Ok(self.otps.read().await.get(email).cloned())
    }

    async fn consume(&self, email: &str, code: &str) -> Result<bool> {
        let mut otps = self.otps.write().await;
        let matches = otps
            .get(email)
            .is_some_and(|challenge| challenge.code == code && challenge.expires_at > Utc::now());
        if matches {
            otps.remove(email);
        }
        Ok(matches)
    }

    async fn delete_by_email(&self, email: &str) -> Result<()> {
        self.otps.write().await.remove(email);
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn insert(&self, token_hash: Vec<u8>, session: Session) -> Result<()> {
        self.sessions.write().await.insert(token_hash, session);
        Ok(())
    }

    async fn find_by_hash(&self, token_hash: &[u8]) -> Result<Option<Session>> {
        Ok(self
            .sessions
            .read()
            .await
            .get(token_hash)
            .filter(|session| session.expires_at > Utc::now())
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use chrono::Duration;

    fn user(email: &str, name: &str) -> User {
        User {
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            name: name.to_string(),
            phone: "555-0100".to_string(),
            address: "1 Main St".to_string(),
        }
    }

    fn challenge(email: &str, code: &str, ttl_seconds: i64) -> OtpChallenge {
        OtpChallenge {
            email: email.to_string(),
            code: code.to_string(),
            expires_at: Utc::now() + Duration::seconds(ttl_seconds),
        }
    }

    #[tokio::test]
    async fn user_upsert_round_trips() -> Result<()> {
        let store = MemoryStore::new();
        UserStore::upsert(&store, user("a@x.com", "Alice")).await?;
        let found = UserStore::find_by_email(&store, "a@x.com").await?;
        assert_eq!(found.map(|u| u.name), Some("Alice".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn user_upsert_is_last_write_wins() -> Result<()> {
        let store = MemoryStore::new();
        UserStore::upsert(&store, user("a@x.com", "Alice")).await?;
        UserStore::upsert(&store, user("a@x.com", "Alicia")).await?;
        let all = store.list_all().await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Alicia");
        Ok(())
    }

    #[tokio::test]
    async fn unknown_user_is_absent_not_an_error() -> Result<()> {
        let store = MemoryStore::new();
        assert!(UserStore::find_by_email(&store, "ghost@x.com")
            .await?
            .is_none());
        Ok(())
    }

    #[tokio::test]
    async fn otp_upsert_supersedes_previous_challenge() -> Result<()> {
        let store = MemoryStore::new();
        OtpStore::upsert(&store, challenge("a@x.com", "111111", 300)).await?;
        OtpStore::upsert(&store, challenge("a@x.com", "222222", 300)).await?;
        let found = OtpStore::find_by_email(&store, "a@x.com").await?;
        assert_eq!(found.map(|c| c.code), Some("222222".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn consume_deletes_only_on_match() -> Result<()> {
        let store = MemoryStore::new();
        OtpStore::upsert(&store, challenge("a@x.com", "123456", 300)).await?;

        assert!(!store.consume("a@x.com", "654321").await?);
        assert!(OtpStore::find_by_email(&store, "a@x.com").await?.is_some());

        assert!(store.consume("a@x.com", "123456").await?);
        assert!(OtpStore::find_by_email(&store, "a@x.com").await?.is_none());

        // Consumed challenges cannot be replayed.
        assert!(!store.consume("a@x.com", "123456").await?);
        Ok(())
    }

    #[tokio::test]
    async fn consume_rejects_expired_challenge() -> Result<()> {
        let store = MemoryStore::new();
        OtpStore::upsert(&store, challenge("a@x.com", "123456", -1)).await?;
        assert!(!store.consume("a@x.com", "123456").await?);
        Ok(())
    }

    #[tokio::test]
    async fn delete_is_a_noop_when_absent() -> Result<()> {
        let store = MemoryStore::new();
        store.delete_by_email("ghost@x.com").await?;
        Ok(())
    }

    #[tokio::test]
    async fn session_lookup_ignores_expired() -> Result<()> {
        let store = MemoryStore::new();
        let hash = vec![1u8; 32];
        store
            .insert(
                hash.clone(),
                Session {
                    email: "a@x.com".to_string(),
                    expires_at: Utc::now() - Duration::seconds(1),
                },
            )
            .await?;
        assert!(store.find_by_hash(&hash).await?.is_none());
        Ok(())
    }
}
