//! Account record and credential material.
//!
//! The core never persists accounts itself; it reads them through the
//! [`AccountRepository`](crate::domain::ports::AccountRepository) port.
//! Password digests use salted SHA-256; the salt is regenerated on every
//! password change and the change instant is stamped into `reset_pw_time`,
//! which is what retroactively invalidates previously issued tokens.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Enabled/disabled account flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    /// Account may authenticate and act.
    Enabled,
    /// Account exists but is locked out.
    Disabled,
}

impl AccountStatus {
    /// Wire representation (1 enabled, 0 disabled).
    #[must_use]
    pub fn as_number(self) -> u64 {
        match self {
            Self::Enabled => 1,
            Self::Disabled => 0,
        }
    }

    /// Parse the wire representation.
    #[must_use]
    pub fn from_number(value: u64) -> Option<Self> {
        match value {
            1 => Some(Self::Enabled),
            0 => Some(Self::Disabled),
            _ => None,
        }
    }
}

/// Principal identified by a token subject.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Opaque identifier; doubles as the token subject.
    pub id: String,
    /// Unique login name.
    pub username: String,
    /// Display name.
    pub nickname: String,
    /// Contact number.
    pub phone: String,
    /// Enabled/disabled flag; checked by the permission baseline, not by
    /// token resolution.
    pub status: AccountStatus,
    /// Elevated-permission flag.
    pub is_superuser: bool,
    /// Set by an administrator to force a password change before the account
    /// may act again.
    pub require_password_reset: bool,
    /// Instant of the most recent password change, if any. Tokens issued
    /// strictly before this instant are invalid.
    pub reset_pw_time: Option<DateTime<Utc>>,
    /// Registration instant.
    pub registered_at: DateTime<Utc>,
    password: String,
    salt: String,
}

impl Account {
    /// Fresh enabled account without credentials.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        nickname: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            nickname: nickname.into(),
            phone: phone.into(),
            status: AccountStatus::Enabled,
            is_superuser: false,
            require_password_reset: false,
            reset_pw_time: None,
            registered_at: Utc::now(),
            password: String::new(),
            salt: String::new(),
        }
    }

    /// Builder-style superuser flag.
    #[must_use]
    pub fn superuser(mut self, value: bool) -> Self {
        self.is_superuser = value;
        self
    }

    /// True when the account may act.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.status == AccountStatus::Enabled
    }

    /// Replace the password digest with a fresh salt and stamp the change
    /// instant, invalidating tokens issued before `now`.
    pub fn set_password(&mut self, raw: &str, now: DateTime<Utc>) {
        let salt = Uuid::new_v4()
            .to_string()
            .split('-')
            .next()
            .unwrap_or_default()
            .to_owned();
        self.password = Self::digest(&salt, raw);
        self.salt = salt;
        self.reset_pw_time = Some(now);
        self.require_password_reset = false;
    }

    /// Check a candidate password against the stored digest.
    #[must_use]
    pub fn verify_password(&self, raw: &str) -> bool {
        !self.password.is_empty() && Self::digest(&self.salt, raw) == self.password
    }

    fn digest(salt: &str, raw: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(raw.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_the_set_password_only() {
        let mut account = Account::new("1", "ada", "Ada", "13800000000");
        account.set_password("s3cret", Utc::now());
        assert!(account.verify_password("s3cret"));
        assert!(!account.verify_password("S3cret"));
        assert!(!account.verify_password(""));
    }

    #[test]
    fn credentials_never_verify_before_a_password_is_set() {
        let account = Account::new("1", "ada", "Ada", "13800000000");
        assert!(!account.verify_password(""));
    }

    #[test]
    fn set_password_rotates_the_salt_and_stamps_reset_time() {
        let mut account = Account::new("1", "ada", "Ada", "13800000000");
        account.set_password("same", Utc::now());
        let first_digest = account.password.clone();
        account.set_password("same", Utc::now());
        assert_ne!(first_digest, account.password);
        assert!(account.reset_pw_time.is_some());
    }

    #[test]
    fn status_round_trips_through_wire_numbers() {
        assert_eq!(AccountStatus::from_number(1), Some(AccountStatus::Enabled));
        assert_eq!(AccountStatus::from_number(0), Some(AccountStatus::Disabled));
        assert_eq!(AccountStatus::from_number(7), None);
        assert_eq!(AccountStatus::Enabled.as_number(), 1);
    }
}
