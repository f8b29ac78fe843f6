// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Backend library for the Embrace Your Journey health tracker.
//!
//! The core is session-backed authentication: issuing signed bearer tokens
//! bound to server-side session rows, validating them on every protected
//! request, and the account lifecycle around them. Everything persistent sits
//! behind the [`store::CredentialStore`] trait.

pub mod accounts;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod store;
pub mod validation;

use std::sync::Arc;
use std::time::Duration;

use crate::accounts::AccountService;
use crate::auth::{AuthRateLimiter, SessionIssuer, TokenService};
use crate::config::Settings;
use crate::store::CredentialStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Credential store backend
    pub store: Arc<dyn CredentialStore>,
    /// Account lifecycle service
    pub accounts: AccountService,
    /// Session issuer
    pub sessions: SessionIssuer,
    /// Token signer/verifier
    pub tokens: TokenService,
    /// Auth attempt rate limiter
    pub rate_limiter: Arc<AuthRateLimiter>,
    /// Settings
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create a new application state
    pub fn new(store: Arc<dyn CredentialStore>, settings: Settings) -> Self {
        let tokens = TokenService::new(&settings.jwt_secret);
        let sessions = SessionIssuer::new(
            tokens.clone(),
            store.clone(),
            settings.session_ttl_secs,
            settings.remember_me_ttl_secs,
        );
        let accounts = AccountService::new(store.clone(), sessions.clone());
        let rate_limiter = Arc::new(AuthRateLimiter::new(
            Duration::from_secs(settings.rate_limit.window_secs),
            settings.rate_limit.max_attempts,
        ));

        Self {
            store,
            accounts,
            sessions,
            tokens,
            rate_limiter,
            settings: Arc::new(settings),
        }
    }
}
