//! One-time passcode issuance and validation.
//!
//! Codes are 6 ASCII digits drawn uniformly from [100000, 999999], carry a
//! TTL, and are consumed on successful validation so they cannot be
//! replayed. Issuing a new code for an email supersedes any outstanding
//! one in a single atomic store upsert.

use anyhow::Result;
use chrono::{Duration, Utc};
use rand::Rng;
use std::sync::Arc;
use tracing::debug;

use crate::store::{OtpChallenge, OtpStore};

/// Default time-to-live for issued codes.
pub const DEFAULT_OTP_TTL_SECONDS: i64 = 300;

/// Draw a 6-digit code from the inclusive range [100000, 999999].
pub fn generate_code<R: Rng>(rng: &mut R) -> String {
    rng.gen_range(100_000..=999_999).to_string()
}

#[derive(Clone)]
pub struct OtpManager {
    store: Arc<dyn OtpStore>,
    ttl_seconds: i64,
}

impl OtpManager {
    #[must_use]
    pub fn new(store: Arc<dyn OtpStore>, ttl_seconds: i64) -> Self {
        Self { store, ttl_seconds }
    }

    /// Issue a fresh challenge for `email`, superseding any outstanding one.
    ///
    /// The code is returned to the caller for out-of-band delivery; the
    /// gateway never includes it in a response body.
    ///
    /// # Errors
    /// Returns an error if the store write fails.
    pub async fn issue(&self, email: &str) -> Result<String> {
        let code = generate_code(&mut rand::thread_rng());
        let challenge = OtpChallenge {
            email: email.to_string(),
            code: code.clone(),
            expires_at: Utc::now() + Duration::seconds(self.ttl_seconds),
        };
        self.store.upsert(challenge).await?;
        debug!(email, "issued OTP challenge");
        Ok(code)
    }

    /// Check `submitted` against the outstanding challenge for `email`.
    ///
    /// Returns false when no live challenge exists or the codes differ;
    /// a matching challenge is consumed so it validates exactly once.
    ///
    /// # Errors
    /// Returns an error if the store lookup fails.
    pub async fn validate(&self, email: &str, submitted: &str) -> Result<bool> {
        let consumed = self.store.consume(email, submitted).await?;
        if !consumed {
            debug!(email, "OTP validation failed");
        }
        Ok(consumed)
    }
}
