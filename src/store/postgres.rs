//! Postgres-backed stores.
//!
//! Upserts use `INSERT .. ON CONFLICT DO UPDATE` so superseding a record is
//! a single atomic statement, and `consume` deletes the challenge in the
//! same statement that matches it.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::Instrument;

use super::{OtpChallenge, OtpStore, Session, SessionStore, User, UserStore};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn query_span(operation: &str, statement: &str) -> tracing::Span {
    tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = operation,
        db.statement = statement
    )
}

#[async_trait]
impl UserStore for PgStore {
    async fn upsert(&self, user: User) -> Result<()> {
        let query = r"
            INSERT INTO users (email, password_hash, name, phone, address)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email) DO UPDATE SET
                password_hash = EXCLUDED.password_hash,
                name = EXCLUDED.name,
                phone = EXCLUDED.phone,
                address = EXCLUDED.address,
                updated_at = NOW()
        ";
        sqlx::query(query)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.name)
            .bind(&user.phone)
            .bind(&user.address)
            .execute(&self.pool)
            .instrument(query_span("INSERT", query))
            .await
            .context("failed to upsert user")?;
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let query = "SELECT email, password_hash, name, phone, address FROM users WHERE email = $1";
        let row = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .instrument(query_span("SELECT", query))
            .await
            .context("failed to lookup user")?;

        Ok(row.map(|row| User {
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            name: row.get("name"),
            phone: row.get("phone"),
            address: row.get("address"),
        }))
    }

    async fn list_all(&self) -> Result<Vec<User>> {
        let query =
            "SELECT email, password_hash, name, phone, address FROM users ORDER BY email";
        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .instrument(query_span("SELECT", query))
            .await
            .context("failed to list users")?;

        Ok(rows
            .into_iter()
            .map(|row| User {
                email: row.get("email"),
                password_hash: row.get("password_hash"),
                name: row.get("name"),
                phone: row.get("phone"),
                address: row.get("address"),
            })
            .collect())
    }
}

#[async_trait]
impl OtpStore for PgStore {
    async fn upsert(&self, challenge: OtpChallenge) -> Result<()> {
        let query = r"
            INSERT INTO otp_challenges (email, code, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE SET
                code = EXCLUDED.code,
                expires_at = EXCLUDED.expires_at,
                created_at = NOW()
        ";
        sqlx::query(query)
            .bind(&challenge.email)
            .bind(&challenge.code)
            .bind(challenge.expires_at)
            .execute(&self.pool)
            .instrument(query_span("INSERT", query))
            .await
            .context("failed to upsert OTP challenge")?;
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<OtpChallenge>> {
        let query = "SELECT email, code, expires_at FROM otp_challenges WHERE email = $1";
        let row = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .instrument(query_span("SELECT", query))
            .await
            .context("failed to lookup OTP challenge")?;

        Ok(row.map(|row| OtpChallenge {
            email: row.get("email"),
            code: row.get("code"),
            expires_at: row.get("expires_at"),
        }))
    }

    async fn consume(&self, email: &str, code: &str) -> Result<bool> {
        // Match and delete in one statement so a validated code cannot be
        // replayed by a concurrent request.
        let query = r"
            DELETE FROM otp_challenges
            WHERE email = $1
              AND code = $2
              AND expires_at > NOW()
            RETURNING email
        ";
        let row = sqlx::query(query)
            .bind(email)
            .bind(code)
            .fetch_optional(&self.pool)
            .instrument(query_span("DELETE", query))
            .await
            .context("failed to consume OTP challenge")?;
        Ok(row.is_some())
    }

    async fn delete_by_email(&self, email: &str) -> Result<()> {
        // Deleting an absent challenge is fine; no rows affected.
        let query = "DELETE FROM otp_challenges WHERE email = $1";
        sqlx::query(query)
            .bind(email)
            .execute(&self.pool)
            .instrument(query_span("DELETE", query))
            .await
            .context("failed to delete OTP challenge")?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn insert(&self, token_hash: Vec<u8>, session: Session) -> Result<()> {
        let query = r"
            INSERT INTO sessions (token_hash, email, expires_at)
            VALUES ($1, $2, $3)
        ";
        sqlx::query(query)
            .bind(token_hash)
            .bind(&session.email)
            .bind(session.expires_at)
            .execute(&self.pool)
            .instrument(query_span("INSERT", query))
            .await
            .context("failed to insert session")?;
        Ok(())
    }

    async fn find_by_hash(&self, token_hash: &[u8]) -> Result<Option<Session>> {
        let query = r"
            SELECT email, expires_at
            FROM sessions
            WHERE token_hash = $1
              AND expires_at > NOW()
            LIMIT 1
        ";
        let row = sqlx::query(query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .instrument(query_span("SELECT", query))
            .await
            .context("failed to lookup session")?;

        Ok(row.map(|row| Session {
            email: row.get("email"),
            expires_at: row.get("expires_at"),
        }))
    }
}
