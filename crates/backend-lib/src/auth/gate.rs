// ============================
// crates/backend-lib/src/auth/gate.rs
// ============================
//! The auth gate: resolves a request's bearer token to a caller identity.
//!
//! One core check with three extractor faces:
//! - [`CurrentUser`] rejects on any failure (strict gate),
//! - [`MaybeUser`] resolves to `None` instead (guest-friendly endpoints),
//! - [`AdminUser`] additionally requires the admin flag.
//!
//! Both the token's embedded expiry and the stored session row are enforced.
//! Collapsing to one check would break revocation: a logout or password
//! change must kill a token whose signature and expiry are still valid.
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use std::convert::Infallible;

use crate::error::AppError;
use crate::AppState;

/// The identity resolved for an authenticated request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub account_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// The session row backing this request; logout deactivates exactly this.
    pub session_id: String,
}

/// Pull the token out of `Authorization: Bearer <token>`.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}

/// Resolve a bearer token to an identity, or say precisely why not.
pub async fn authenticate(state: &AppState, parts: &Parts) -> Result<CurrentUser, AppError> {
    let token = bearer_token(parts).ok_or(AppError::MissingToken)?;

    // signature, structure, and the token's own embedded expiry
    state.tokens.decode(token)?;

    // independently, the server-side session row must be live and its
    // owning account still active
    let session = state
        .store
        .find_active_session_by_token(token)
        .await?
        .ok_or(AppError::InvalidOrExpiredSession)?;

    let account = state
        .store
        .get_account(&session.account_id)
        .await?
        .filter(|account| account.is_active)
        .ok_or(AppError::InvalidOrExpiredSession)?;

    Ok(CurrentUser {
        account_id: account.id,
        email: account.email,
        first_name: account.first_name,
        last_name: account.last_name,
        session_id: session.id,
    })
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(state, parts).await
    }
}

/// Optional gate: `None` for guests, never a rejection.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(authenticate(state, parts).await.ok()))
    }
}

/// Admin gate: the strict gate plus an `is_admin` re-check against the store.
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(state, parts).await?;

        let is_admin = state
            .store
            .get_account(&user.account_id)
            .await?
            .map(|account| account.is_admin)
            .unwrap_or(false);
        if !is_admin {
            return Err(AppError::AdminRequired);
        }

        Ok(AdminUser(user))
    }
}
