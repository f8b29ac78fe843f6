// ============================
// crates/backend-lib/src/models.rs
// ============================
//! Persisted records: accounts, sessions, and per-account tracking counters.
use chrono::{DateTime, Utc};
use embrace_common::{MenopauseStage, ProfileView, UserView};
use serde::{Deserialize, Serialize};

/// An account record as stored. `password_hash` never leaves this crate;
/// everything client-facing goes through [`Account::view`].
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Account {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Case-normalized, advisory-unique across all accounts (any status).
    pub email: String,
    pub password_hash: String,
    pub age: i64,
    pub menopause_stage: MenopauseStage,
    pub newsletter: bool,
    /// Soft-delete flag. Deleted accounts stay on record with this false.
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl Account {
    pub fn view(&self) -> UserView {
        UserView {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            age: self.age,
            menopause_stage: self.menopause_stage,
            newsletter: self.newsletter,
        }
    }

    pub fn profile_view(&self, goals: &AccountGoals) -> ProfileView {
        ProfileView {
            user: self.view(),
            created_at: self.created_at,
            last_login: self.last_login,
            days_tracked: goals.days_tracked,
            symptoms_logged: goals.symptoms_logged,
            medications_taken: goals.medications_taken,
            goals_achieved: goals.goals_achieved,
        }
    }
}

/// Fields the caller supplies when creating an account; the store generates
/// the id and stamps `created_at`.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub age: i64,
    pub menopause_stage: MenopauseStage,
    pub newsletter: bool,
}

/// Partial profile update. `None` leaves the field untouched; email and
/// password are not reachable from here.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i64>,
    pub menopause_stage: Option<MenopauseStage>,
    pub newsletter: Option<bool>,
}

/// Server-side session row binding an issued token to an account.
///
/// Usable only while `is_active` is true, `expires_at` is in the future, and
/// the owning account is itself active. Rows are deactivated, never deleted.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Session {
    pub id: String,
    pub account_id: String,
    /// The issued bearer credential, stored verbatim.
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Derived tracking counters, one per account, created zeroed at
/// registration. Incremented by the tracking features, not by auth.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct AccountGoals {
    pub account_id: String,
    pub days_tracked: u32,
    pub symptoms_logged: u32,
    pub medications_taken: u32,
    pub goals_achieved: u32,
}
