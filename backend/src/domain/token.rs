//! Stateless signed credentials.
//!
//! Tokens are HS256-signed claims `{id, iat, exp}`; nothing is persisted.
//! Server-side invalidation needs no revocation list: validity is recomputed
//! on every resolve against the account's `reset_pw_time`, so resetting a
//! password instantly invalidates everything issued before it.
//!
//! Every resolution failure collapses to "no identity". Callers cannot
//! distinguish an expired token from a tampered or absent one; the collapse
//! keeps authentication internals off the wire.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::error::ApiError;
use crate::domain::ports::AccountRepository;
use crate::domain::Account;

/// Credential scheme prefix on the `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: String,
    iat: i64,
    exp: i64,
}

/// Issues and resolves bearer credentials.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    ttl_seconds: i64,
    accounts: Arc<dyn AccountRepository>,
}

impl TokenService {
    /// Service signing with `secret` and a fixed time-to-live.
    #[must_use]
    pub fn new(secret: impl Into<String>, ttl_seconds: i64, accounts: Arc<dyn AccountRepository>) -> Self {
        Self {
            secret: secret.into(),
            ttl_seconds,
            accounts,
        }
    }

    /// Issue a credential for an account, valid from now for the TTL.
    pub fn issue(&self, account: &Account) -> Result<String, ApiError> {
        self.issue_at(account, Utc::now())
    }

    /// Issue with an explicit `now`; the seam time-window tests use.
    pub fn issue_at(&self, account: &Account, now: DateTime<Utc>) -> Result<String, ApiError> {
        let iat = now.timestamp();
        let claims = Claims {
            id: account.id.clone(),
            iat,
            exp: iat + self.ttl_seconds,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(ApiError::unhandled)
    }

    /// Resolve an `Authorization` header value to an identity.
    ///
    /// Returns `None` for a missing header, a non-bearer scheme, any
    /// signature/claim/expiry failure, an unknown subject, and a token
    /// issued strictly before the account's last password reset. A disabled
    /// account still resolves; the permission baseline owns that check so it
    /// can report the distinct reason.
    pub async fn resolve(&self, header: Option<&str>) -> Option<Account> {
        let token = header?.strip_prefix(BEARER_PREFIX)?;
        let claims = self.decode(token)?;
        let account = self.accounts.find_by_id(&claims.id).await.ok().flatten()?;
        if let Some(reset_at) = account.reset_pw_time {
            // Tokens issued in the same second as the reset stay valid; the
            // invalidation bound is strict.
            if reset_at.timestamp() > claims.iat {
                return None;
            }
        }
        Some(account)
    }

    fn decode(&self, token: &str) -> Option<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        // The validity window is exact; no clock-skew allowance.
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .ok()
        .map(|data| data.claims)
    }
}
