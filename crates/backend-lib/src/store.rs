// ============================
// crates/backend-lib/src/store.rs
// ============================
//! Credential store abstraction with an in-memory implementation.
//!
//! The store is deliberately generic: equality lookups by field, document
//! creation returning a generated id, and a batch deactivate that is
//! monotonic and therefore safe to re-run. A database-backed implementation
//! slots in behind [`CredentialStore`] without touching the auth core.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Account, AccountGoals, NewAccount, ProfileChanges, Session};

/// Trait for credential storage backends
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Create an account, generating its id and creation timestamp.
    async fn create_account(&self, account: NewAccount) -> Result<Account, AppError>;

    /// Find an account by normalized email, regardless of active status.
    /// Registration's duplicate check runs against ALL accounts.
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, AppError>;

    /// Find an active account by normalized email (login path).
    async fn find_active_account_by_email(&self, email: &str)
        -> Result<Option<Account>, AppError>;

    /// Fetch an account by id, any status.
    async fn get_account(&self, id: &str) -> Result<Option<Account>, AppError>;

    /// Apply a partial profile update. Missing accounts are a no-op.
    async fn update_profile(&self, id: &str, changes: ProfileChanges) -> Result<(), AppError>;

    /// Replace the stored password hash.
    async fn set_password_hash(&self, id: &str, hash: &str) -> Result<(), AppError>;

    /// Stamp the last successful login.
    async fn set_last_login(&self, id: &str, when: DateTime<Utc>) -> Result<(), AppError>;

    /// Soft delete: flip `is_active` to false, keep the record.
    async fn deactivate_account(&self, id: &str) -> Result<(), AppError>;

    /// Grant or revoke the admin flag. There is no HTTP route for this;
    /// operators set it out of band and registration never grants it.
    async fn set_admin(&self, id: &str, is_admin: bool) -> Result<(), AppError>;

    /// All accounts, any status (admin surface).
    async fn list_accounts(&self) -> Result<Vec<Account>, AppError>;

    /// Create the zeroed goals record for a new account.
    async fn create_goals(&self, account_id: &str) -> Result<AccountGoals, AppError>;

    /// Fetch the goals record, if the registration ever got that far.
    async fn get_goals(&self, account_id: &str) -> Result<Option<AccountGoals>, AppError>;

    /// Record a freshly issued session.
    async fn create_session(
        &self,
        account_id: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, AppError>;

    /// Find the session holding this exact token, if it is still active and
    /// its own expiry has not passed. Account status is the caller's check.
    async fn find_active_session_by_token(&self, token: &str)
        -> Result<Option<Session>, AppError>;

    /// Deactivate exactly one session (logout).
    async fn deactivate_session(&self, session_id: &str) -> Result<(), AppError>;

    /// Deactivate every active session for an account (password change,
    /// account deletion). Returns how many sessions were flipped.
    async fn deactivate_sessions_for_account(&self, account_id: &str) -> Result<u64, AppError>;
}

/// In-memory implementation over concurrent maps. Backs tests and
/// single-instance development deployments; nothing is persisted.
#[derive(Default)]
pub struct MemoryStore {
    accounts: DashMap<String, Account>,
    sessions: DashMap<String, Session>,
    goals: DashMap<String, AccountGoals>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn create_account(&self, account: NewAccount) -> Result<Account, AppError> {
        let record = Account {
            id: Uuid::new_v4().to_string(),
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email,
            password_hash: account.password_hash,
            age: account.age,
            menopause_stage: account.menopause_stage,
            newsletter: account.newsletter,
            is_active: true,
            is_admin: false,
            created_at: Utc::now(),
            last_login: None,
        };
        self.accounts.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        Ok(self
            .accounts
            .iter()
            .find(|entry| entry.email == email)
            .map(|entry| entry.value().clone()))
    }

    async fn find_active_account_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Account>, AppError> {
        Ok(self
            .accounts
            .iter()
            .find(|entry| entry.email == email && entry.is_active)
            .map(|entry| entry.value().clone()))
    }

    async fn get_account(&self, id: &str) -> Result<Option<Account>, AppError> {
        Ok(self.accounts.get(id).map(|entry| entry.value().clone()))
    }

    async fn update_profile(&self, id: &str, changes: ProfileChanges) -> Result<(), AppError> {
        if let Some(mut entry) = self.accounts.get_mut(id) {
            if let Some(first_name) = changes.first_name {
                entry.first_name = first_name;
            }
            if let Some(last_name) = changes.last_name {
                entry.last_name = last_name;
            }
            if let Some(age) = changes.age {
                entry.age = age;
            }
            if let Some(stage) = changes.menopause_stage {
                entry.menopause_stage = stage;
            }
            if let Some(newsletter) = changes.newsletter {
                entry.newsletter = newsletter;
            }
        }
        Ok(())
    }

    async fn set_password_hash(&self, id: &str, hash: &str) -> Result<(), AppError> {
        if let Some(mut entry) = self.accounts.get_mut(id) {
            entry.password_hash = hash.to_string();
        }
        Ok(())
    }

    async fn set_last_login(&self, id: &str, when: DateTime<Utc>) -> Result<(), AppError> {
        if let Some(mut entry) = self.accounts.get_mut(id) {
            entry.last_login = Some(when);
        }
        Ok(())
    }

    async fn deactivate_account(&self, id: &str) -> Result<(), AppError> {
        if let Some(mut entry) = self.accounts.get_mut(id) {
            entry.is_active = false;
        }
        Ok(())
    }

    async fn set_admin(&self, id: &str, is_admin: bool) -> Result<(), AppError> {
        if let Some(mut entry) = self.accounts.get_mut(id) {
            entry.is_admin = is_admin;
        }
        Ok(())
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        Ok(self.accounts.iter().map(|entry| entry.value().clone()).collect())
    }

    async fn create_goals(&self, account_id: &str) -> Result<AccountGoals, AppError> {
        let record = AccountGoals {
            account_id: account_id.to_string(),
            ..AccountGoals::default()
        };
        self.goals.insert(account_id.to_string(), record.clone());
        Ok(record)
    }

    async fn get_goals(&self, account_id: &str) -> Result<Option<AccountGoals>, AppError> {
        Ok(self.goals.get(account_id).map(|entry| entry.value().clone()))
    }

    async fn create_session(
        &self,
        account_id: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, AppError> {
        let record = Session {
            id: Uuid::new_v4().to_string(),
            account_id: account_id.to_string(),
            token: token.to_string(),
            expires_at,
            is_active: true,
        };
        self.sessions.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn find_active_session_by_token(
        &self,
        token: &str,
    ) -> Result<Option<Session>, AppError> {
        let now = Utc::now();
        Ok(self
            .sessions
            .iter()
            .find(|entry| entry.token == token && entry.is_active && entry.expires_at > now)
            .map(|entry| entry.value().clone()))
    }

    async fn deactivate_session(&self, session_id: &str) -> Result<(), AppError> {
        if let Some(mut entry) = self.sessions.get_mut(session_id) {
            entry.is_active = false;
        }
        Ok(())
    }

    async fn deactivate_sessions_for_account(&self, account_id: &str) -> Result<u64, AppError> {
        let mut flipped = 0;
        for mut entry in self.sessions.iter_mut() {
            if entry.account_id == account_id && entry.is_active {
                entry.is_active = false;
                flipped += 1;
            }
        }
        Ok(flipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embrace_common::MenopauseStage;

    fn new_account(email: &str) -> NewAccount {
        NewAccount {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: email.into(),
            password_hash: "$scrypt$fake".into(),
            age: 42,
            menopause_stage: MenopauseStage::NotSure,
            newsletter: false,
        }
    }

    #[tokio::test]
    async fn create_account_generates_id_and_defaults() {
        let store = MemoryStore::new();
        let account = store.create_account(new_account("a@x.com")).await.unwrap();
        assert!(!account.id.is_empty());
        assert!(account.is_active);
        assert!(!account.is_admin);
        assert!(account.last_login.is_none());

        let fetched = store.get_account(&account.id).await.unwrap().unwrap();
        assert_eq!(fetched.email, "a@x.com");
    }

    #[tokio::test]
    async fn email_lookup_sees_inactive_accounts() {
        let store = MemoryStore::new();
        let account = store.create_account(new_account("a@x.com")).await.unwrap();
        store.deactivate_account(&account.id).await.unwrap();

        // any-status lookup still finds it, active-only does not
        assert!(store
            .find_account_by_email("a@x.com")
            .await
            .unwrap()
            .is_some());
        assert!(store
            .find_active_account_by_email("a@x.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn admin_flag_is_settable_and_revocable() {
        let store = MemoryStore::new();
        let account = store.create_account(new_account("a@x.com")).await.unwrap();
        assert!(!account.is_admin);

        store.set_admin(&account.id, true).await.unwrap();
        let fetched = store.get_account(&account.id).await.unwrap().unwrap();
        assert!(fetched.is_admin);

        store.set_admin(&account.id, false).await.unwrap();
        let fetched = store.get_account(&account.id).await.unwrap().unwrap();
        assert!(!fetched.is_admin);
    }

    #[tokio::test]
    async fn expired_or_inactive_sessions_are_invisible() {
        let store = MemoryStore::new();
        let live = store
            .create_session("acc-1", "tok-live", Utc::now() + chrono::Duration::hours(1))
            .await
            .unwrap();
        store
            .create_session("acc-1", "tok-old", Utc::now() - chrono::Duration::seconds(1))
            .await
            .unwrap();

        assert!(store
            .find_active_session_by_token("tok-live")
            .await
            .unwrap()
            .is_some());
        assert!(store
            .find_active_session_by_token("tok-old")
            .await
            .unwrap()
            .is_none());

        store.deactivate_session(&live.id).await.unwrap();
        assert!(store
            .find_active_session_by_token("tok-live")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn batch_deactivate_is_scoped_and_idempotent() {
        let store = MemoryStore::new();
        let later = Utc::now() + chrono::Duration::hours(1);
        store.create_session("acc-1", "t1", later).await.unwrap();
        store.create_session("acc-1", "t2", later).await.unwrap();
        store.create_session("acc-2", "t3", later).await.unwrap();

        assert_eq!(
            store.deactivate_sessions_for_account("acc-1").await.unwrap(),
            2
        );
        // re-running is safe and flips nothing further
        assert_eq!(
            store.deactivate_sessions_for_account("acc-1").await.unwrap(),
            0
        );
        assert!(store
            .find_active_session_by_token("t3")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn partial_profile_update_leaves_other_fields() {
        let store = MemoryStore::new();
        let account = store.create_account(new_account("a@x.com")).await.unwrap();
        store
            .update_profile(
                &account.id,
                ProfileChanges {
                    age: Some(43),
                    ..ProfileChanges::default()
                },
            )
            .await
            .unwrap();

        let fetched = store.get_account(&account.id).await.unwrap().unwrap();
        assert_eq!(fetched.age, 43);
        assert_eq!(fetched.first_name, "Ada");
        assert_eq!(fetched.email, "a@x.com");
    }
}
