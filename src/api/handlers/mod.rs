pub mod health;
pub use self::health::health;

pub mod register;
pub use self::register::{get_all, register};

pub mod login;
pub use self::login::{login, login_challenge};

pub mod otp;
pub use self::otp::{forgot_password, verify_otp};

pub mod types;

// common functions for the handlers
use regex::Regex;
use std::sync::OnceLock;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

/// Normalize an email for lookup/uniqueness checks.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
pub fn valid_email(email: &str) -> bool {
    EMAIL_RE
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern"))
        .is_match(email)
}
