// ============================
// crates/backend-lib/src/auth/session.rs
// ============================
//! Session issuance.
//!
//! Minting a bearer token and recording its server-side session row happen
//! here, from a single `Utc::now()`, so the token's embedded expiry and the
//! row's `expires_at` always agree to the second.
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use crate::auth::token::TokenService;
use crate::error::AppError;
use crate::models::Account;
use crate::store::CredentialStore;

/// Default session TTL (24 hours)
pub const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60 * 24;

/// Remember-me session TTL (30 days)
pub const REMEMBER_ME_TTL_SECS: u64 = 60 * 60 * 24 * 30;

/// A freshly minted session.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    /// Human-readable lifetime label returned as `expiresIn` ("24h" / "30d").
    pub expires_in: String,
}

/// Mints tokens and records the matching session rows.
#[derive(Clone)]
pub struct SessionIssuer {
    tokens: TokenService,
    store: Arc<dyn CredentialStore>,
    default_ttl: Duration,
    remember_me_ttl: Duration,
}

impl SessionIssuer {
    pub fn new(
        tokens: TokenService,
        store: Arc<dyn CredentialStore>,
        default_ttl_secs: u64,
        remember_me_ttl_secs: u64,
    ) -> Self {
        Self {
            tokens,
            store,
            default_ttl: Duration::seconds(default_ttl_secs as i64),
            remember_me_ttl: Duration::seconds(remember_me_ttl_secs as i64),
        }
    }

    /// Issue a bearer token for the account and persist its session row.
    pub async fn issue(
        &self,
        account: &Account,
        remember_me: bool,
    ) -> Result<IssuedToken, AppError> {
        let ttl = if remember_me {
            self.remember_me_ttl
        } else {
            self.default_ttl
        };

        let now = Utc::now();
        let expires_at = now + ttl;
        let token = self.tokens.issue(&account.id, &account.email, now, ttl)?;
        self.store
            .create_session(&account.id, &token, expires_at)
            .await?;

        tracing::debug!(account_id = %account.id, %expires_at, "session issued");

        Ok(IssuedToken {
            token,
            expires_at,
            expires_in: ttl_label(ttl),
        })
    }
}

// The wire format predates this rewrite: the default day reads "24h", longer
// lifetimes read in days.
fn ttl_label(ttl: Duration) -> String {
    let secs = ttl.num_seconds();
    if secs % (60 * 60 * 24) == 0 && secs > 60 * 60 * 24 {
        format!("{}d", secs / (60 * 60 * 24))
    } else if secs % (60 * 60) == 0 {
        format!("{}h", secs / (60 * 60))
    } else {
        format!("{secs}s")
    }
}
