//! Shared gateway state handed to handlers via `Extension`.

use std::sync::Arc;

use crate::auth::{AuthManager, DEFAULT_SESSION_TTL_SECONDS};
use crate::otp::{OtpManager, DEFAULT_OTP_TTL_SECONDS};
use crate::store::{MemoryStore, OtpStore, SessionStore, UserStore};

#[derive(Clone, Copy, Debug)]
pub struct GatewayConfig {
    pub otp_ttl_seconds: i64,
    pub session_ttl_seconds: i64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            otp_ttl_seconds: DEFAULT_OTP_TTL_SECONDS,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
        }
    }
}

pub struct GatewayState {
    auth: AuthManager,
}

impl GatewayState {
    #[must_use]
    pub fn new(
        config: GatewayConfig,
        users: Arc<dyn UserStore>,
        otps: Arc<dyn OtpStore>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        let otp = OtpManager::new(otps, config.otp_ttl_seconds);
        let auth = AuthManager::new(users, sessions, otp, config.session_ttl_seconds);
        Self { auth }
    }

    /// State backed entirely by the in-memory store; used by tests.
    #[must_use]
    pub fn in_memory(config: GatewayConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(config, store.clone(), store.clone(), store)
    }

    #[must_use]
    pub fn auth(&self) -> &AuthManager {
        &self.auth
    }

    #[must_use]
    pub fn otp(&self) -> &OtpManager {
        self.auth.otp()
    }
}
