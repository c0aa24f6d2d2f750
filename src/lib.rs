//! # Varco (Authentication Gateway)
//!
//! `varco` is a small authentication gateway. It registers users, validates
//! credentials, issues one-time passcodes (OTPs) to confirm logins and
//! password resets, and issues opaque session tokens on successful direct
//! authentication.
//!
//! ## Flows
//!
//! - **OTP-gated login** (`POST /login1` then `POST /verifyOTP`): valid
//!   credentials trigger a 6-digit challenge for out-of-band delivery; the
//!   code is consumed on successful verification and cannot be replayed.
//! - **Direct login** (`POST /login`): an independent path that issues a
//!   bearer token without OTP confirmation.
//! - **Password reset** (`POST /forgotPassword`): always issues a
//!   challenge, so responses carry no user-enumeration signal.
//!
//! ## Storage
//!
//! Managers depend on the `store` traits only. Production uses the
//! Postgres implementation; tests use the in-memory double. Passwords are
//! stored as Argon2id hashes and session tokens as SHA-256 hashes; raw
//! credential material never reaches a store.

pub mod api;
pub mod auth;
pub mod cli;
pub mod otp;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
