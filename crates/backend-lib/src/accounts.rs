// ============================
// crates/backend-lib/src/accounts.rs
// ============================
//! Account lifecycle: register, login, logout, profile, password change,
//! account deletion. Composes the store, the hasher and the session issuer;
//! handlers stay thin on top of this.
use chrono::Utc;
use std::sync::Arc;

use embrace_common::{
    AuthData, ChangePasswordRequest, LoginRequest, ProfileView, RegisterRequest,
    UpdateProfileRequest,
};

use crate::auth::password::{hash_password, verify_password, MIN_PASSWORD_LENGTH};
use crate::auth::SessionIssuer;
use crate::error::AppError;
use crate::models::{AccountGoals, NewAccount, ProfileChanges};
use crate::store::CredentialStore;
use crate::validation::{self, normalize_email};

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn CredentialStore>,
    sessions: SessionIssuer,
}

impl AccountService {
    pub fn new(store: Arc<dyn CredentialStore>, sessions: SessionIssuer) -> Self {
        Self { store, sessions }
    }

    /// Create an account with its zeroed goals record and log it straight in.
    ///
    /// The duplicate-email check is advisory and runs against all accounts,
    /// active or not. It is a check-then-act: a store-level uniqueness
    /// constraint is the real fix for concurrent registration.
    pub async fn register(&self, req: RegisterRequest) -> Result<AuthData, AppError> {
        validation::validate_register(&req)?;

        let email = normalize_email(&req.email);
        if self.store.find_account_by_email(&email).await?.is_some() {
            return Err(AppError::EmailTaken);
        }

        let password_hash = hash_password(&req.password).map_err(AppError::internal)?;
        let stage = req
            .menopause_stage
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        let account = self
            .store
            .create_account(NewAccount {
                first_name: req.first_name.trim().to_string(),
                last_name: req.last_name.trim().to_string(),
                email,
                password_hash,
                age: req.age,
                menopause_stage: stage,
                newsletter: req.newsletter.unwrap_or(false),
            })
            .await?;
        self.store.create_goals(&account.id).await?;

        let issued = self.sessions.issue(&account, false).await?;
        self.store.set_last_login(&account.id, Utc::now()).await?;

        tracing::info!(account_id = %account.id, "account registered");

        Ok(AuthData {
            user: account.view(),
            token: issued.token,
            expires_in: issued.expires_in,
        })
    }

    /// Authenticate by email and password.
    ///
    /// Unknown email and wrong password fail identically; the response never
    /// reveals which factor was wrong.
    pub async fn login(&self, req: LoginRequest) -> Result<AuthData, AppError> {
        validation::validate_login(&req)?;

        let email = normalize_email(&req.email);
        let account = self
            .store
            .find_active_account_by_email(&email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(&account.password_hash, &req.password).map_err(AppError::internal)? {
            return Err(AppError::InvalidCredentials);
        }

        let remember_me = req.remember_me.unwrap_or(false);
        let issued = self.sessions.issue(&account, remember_me).await?;
        self.store.set_last_login(&account.id, Utc::now()).await?;

        tracing::info!(account_id = %account.id, remember_me, "login");

        Ok(AuthData {
            user: account.view(),
            token: issued.token,
            expires_in: issued.expires_in,
        })
    }

    /// Deactivate exactly the caller's current session. Other concurrent
    /// sessions of the same account stay live.
    pub async fn logout(&self, session_id: &str) -> Result<(), AppError> {
        self.store.deactivate_session(session_id).await
    }

    /// The account view merged with its tracking counters.
    pub async fn profile(&self, account_id: &str) -> Result<ProfileView, AppError> {
        let account = self
            .store
            .get_account(account_id)
            .await?
            .filter(|account| account.is_active)
            .ok_or(AppError::AccountNotFound)?;

        // a registration that crashed mid-way may have no goals record
        let goals = self
            .store
            .get_goals(account_id)
            .await?
            .unwrap_or_else(|| AccountGoals {
                account_id: account_id.to_string(),
                ..AccountGoals::default()
            });

        Ok(account.profile_view(&goals))
    }

    /// Partial profile update; email and password are untouchable here.
    pub async fn update_profile(
        &self,
        account_id: &str,
        req: UpdateProfileRequest,
    ) -> Result<(), AppError> {
        let stage = match req.menopause_stage.as_deref() {
            Some(raw) => Some(
                raw.parse()
                    .map_err(|()| AppError::InvalidInput("Invalid menopause stage".into()))?,
            ),
            None => None,
        };

        self.store
            .update_profile(
                account_id,
                ProfileChanges {
                    first_name: req.first_name,
                    last_name: req.last_name,
                    age: req.age,
                    menopause_stage: stage,
                    newsletter: req.newsletter,
                },
            )
            .await
    }

    /// Replace the password and force re-login everywhere: every active
    /// session of the account is deactivated.
    pub async fn change_password(
        &self,
        account_id: &str,
        req: ChangePasswordRequest,
    ) -> Result<(), AppError> {
        if req.new_password.len() < MIN_PASSWORD_LENGTH {
            return Err(AppError::InvalidInput(format!(
                "New password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        let account = self
            .store
            .get_account(account_id)
            .await?
            .filter(|account| account.is_active)
            .ok_or(AppError::AccountNotFound)?;

        if !verify_password(&account.password_hash, &req.current_password)
            .map_err(AppError::internal)?
        {
            return Err(AppError::CurrentPasswordIncorrect);
        }

        let new_hash = hash_password(&req.new_password).map_err(AppError::internal)?;
        self.store.set_password_hash(account_id, &new_hash).await?;
        let revoked = self.store.deactivate_sessions_for_account(account_id).await?;

        tracing::info!(%account_id, revoked, "password changed, sessions revoked");
        Ok(())
    }

    /// Soft delete: the record is retained with `is_active` false, and every
    /// active session is deactivated.
    pub async fn delete_account(&self, account_id: &str, password: &str) -> Result<(), AppError> {
        let account = self
            .store
            .get_account(account_id)
            .await?
            .filter(|account| account.is_active)
            .ok_or(AppError::AccountNotFound)?;

        if !verify_password(&account.password_hash, password).map_err(AppError::internal)? {
            return Err(AppError::PasswordIncorrect);
        }

        self.store.deactivate_account(account_id).await?;
        let revoked = self.store.deactivate_sessions_for_account(account_id).await?;

        tracing::info!(%account_id, revoked, "account soft-deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::{DEFAULT_SESSION_TTL_SECS, REMEMBER_ME_TTL_SECS};
    use crate::auth::TokenService;
    use crate::store::MemoryStore;
    use chrono::Duration;

    fn service() -> (AccountService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let issuer = SessionIssuer::new(
            TokenService::new("unit-test-secret"),
            store.clone(),
            DEFAULT_SESSION_TTL_SECS,
            REMEMBER_ME_TTL_SECS,
        );
        (
            AccountService::new(store.clone(), issuer),
            store,
        )
    }

    fn register_req(email: &str) -> RegisterRequest {
        RegisterRequest {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: email.into(),
            age: 30,
            password: "Secret12!".into(),
            confirm_password: "Secret12!".into(),
            menopause_stage: None,
            newsletter: None,
        }
    }

    fn login_req(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
            remember_me: None,
        }
    }

    #[tokio::test]
    async fn register_issues_a_token_bound_to_the_new_account() {
        let (svc, store) = service();
        let auth = svc.register(register_req("a@x.com")).await.unwrap();

        let claims = TokenService::new("unit-test-secret")
            .decode(&auth.token)
            .unwrap();
        assert_eq!(claims.sub, auth.user.id);

        let session = store
            .find_active_session_by_token(&auth.token)
            .await
            .unwrap()
            .expect("session row exists");
        assert_eq!(session.expires_at.timestamp(), claims.exp);

        // goals record created zeroed, last login stamped
        let goals = store.get_goals(&auth.user.id).await.unwrap().unwrap();
        assert_eq!(goals.days_tracked, 0);
        let account = store.get_account(&auth.user.id).await.unwrap().unwrap();
        assert!(account.last_login.is_some());
        assert_eq!(auth.expires_in, "24h");
    }

    #[tokio::test]
    async fn duplicate_email_conflicts_case_insensitively() {
        let (svc, _) = service();
        svc.register(register_req("a@x.com")).await.unwrap();

        let mut second = register_req("A@X.COM");
        second.first_name = "Grace".into();
        assert!(matches!(
            svc.register(second).await,
            Err(AppError::EmailTaken)
        ));
    }

    #[tokio::test]
    async fn deleted_accounts_still_block_their_email() {
        let (svc, _) = service();
        let auth = svc.register(register_req("a@x.com")).await.unwrap();
        svc.delete_account(&auth.user.id, "Secret12!").await.unwrap();

        assert!(matches!(
            svc.register(register_req("a@x.com")).await,
            Err(AppError::EmailTaken)
        ));
    }

    #[tokio::test]
    async fn login_failure_modes_are_indistinguishable() {
        let (svc, _) = service();
        svc.register(register_req("a@x.com")).await.unwrap();

        let wrong_password = svc.login(login_req("a@x.com", "not-the-one")).await;
        let unknown_email = svc.login(login_req("ghost@x.com", "Secret12!")).await;
        assert!(matches!(wrong_password, Err(AppError::InvalidCredentials)));
        assert!(matches!(unknown_email, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn remember_me_extends_the_session() {
        let (svc, store) = service();
        svc.register(register_req("a@x.com")).await.unwrap();

        let mut req = login_req("a@x.com", "Secret12!");
        req.remember_me = Some(true);
        let auth = svc.login(req).await.unwrap();
        assert_eq!(auth.expires_in, "30d");

        let session = store
            .find_active_session_by_token(&auth.token)
            .await
            .unwrap()
            .unwrap();
        let ttl = session.expires_at - Utc::now();
        assert!(ttl > Duration::days(29) && ttl <= Duration::days(30));
    }

    #[tokio::test]
    async fn logout_revokes_only_the_one_session() {
        let (svc, store) = service();
        svc.register(register_req("a@x.com")).await.unwrap();

        let first = svc.login(login_req("a@x.com", "Secret12!")).await.unwrap();
        let second = svc.login(login_req("a@x.com", "Secret12!")).await.unwrap();

        let first_session = store
            .find_active_session_by_token(&first.token)
            .await
            .unwrap()
            .unwrap();
        svc.logout(&first_session.id).await.unwrap();

        assert!(store
            .find_active_session_by_token(&first.token)
            .await
            .unwrap()
            .is_none());
        assert!(store
            .find_active_session_by_token(&second.token)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn change_password_revokes_every_session() {
        let (svc, store) = service();
        let auth = svc.register(register_req("a@x.com")).await.unwrap();
        let extra = svc.login(login_req("a@x.com", "Secret12!")).await.unwrap();

        svc.change_password(
            &auth.user.id,
            ChangePasswordRequest {
                current_password: "Secret12!".into(),
                new_password: "Newsecret1!".into(),
            },
        )
        .await
        .unwrap();

        for token in [&auth.token, &extra.token] {
            assert!(store
                .find_active_session_by_token(token)
                .await
                .unwrap()
                .is_none());
        }

        // old password dead, new one works
        assert!(matches!(
            svc.login(login_req("a@x.com", "Secret12!")).await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(svc.login(login_req("a@x.com", "Newsecret1!")).await.is_ok());
    }

    #[tokio::test]
    async fn change_password_rejections() {
        let (svc, _) = service();
        let auth = svc.register(register_req("a@x.com")).await.unwrap();

        let too_short = svc
            .change_password(
                &auth.user.id,
                ChangePasswordRequest {
                    current_password: "Secret12!".into(),
                    new_password: "short".into(),
                },
            )
            .await;
        assert!(matches!(too_short, Err(AppError::InvalidInput(_))));

        let wrong_current = svc
            .change_password(
                &auth.user.id,
                ChangePasswordRequest {
                    current_password: "nope".into(),
                    new_password: "Newsecret1!".into(),
                },
            )
            .await;
        assert!(matches!(
            wrong_current,
            Err(AppError::CurrentPasswordIncorrect)
        ));

        let missing = svc
            .change_password(
                "no-such-account",
                ChangePasswordRequest {
                    current_password: "Secret12!".into(),
                    new_password: "Newsecret1!".into(),
                },
            )
            .await;
        assert!(matches!(missing, Err(AppError::AccountNotFound)));
    }

    #[tokio::test]
    async fn delete_account_soft_deletes_and_locks_out() {
        let (svc, store) = service();
        let auth = svc.register(register_req("a@x.com")).await.unwrap();

        assert!(matches!(
            svc.delete_account(&auth.user.id, "wrong").await,
            Err(AppError::PasswordIncorrect)
        ));

        svc.delete_account(&auth.user.id, "Secret12!").await.unwrap();

        // record retained but inactive
        let record = store.get_account(&auth.user.id).await.unwrap().unwrap();
        assert!(!record.is_active);

        assert!(matches!(
            svc.profile(&auth.user.id).await,
            Err(AppError::AccountNotFound)
        ));
        assert!(matches!(
            svc.login(login_req("a@x.com", "Secret12!")).await,
            Err(AppError::InvalidCredentials)
        ));
        // deleting twice reads as missing
        assert!(matches!(
            svc.delete_account(&auth.user.id, "Secret12!").await,
            Err(AppError::AccountNotFound)
        ));
    }

    #[tokio::test]
    async fn profile_merges_goals_and_survives_a_missing_record() {
        let (svc, store) = service();
        let auth = svc.register(register_req("a@x.com")).await.unwrap();

        let profile = svc.profile(&auth.user.id).await.unwrap();
        assert_eq!(profile.user.first_name, "Ada");
        assert_eq!(profile.symptoms_logged, 0);

        // update a couple of fields, leave the rest
        svc.update_profile(
            &auth.user.id,
            UpdateProfileRequest {
                age: Some(31),
                menopause_stage: Some("menopausal".into()),
                ..UpdateProfileRequest::default()
            },
        )
        .await
        .unwrap();

        let profile = svc.profile(&auth.user.id).await.unwrap();
        assert_eq!(profile.user.age, 31);
        assert_eq!(profile.user.last_name, "Lovelace");
        assert_eq!(
            profile.user.menopause_stage,
            embrace_common::MenopauseStage::Menopausal
        );
        // email stays what it was; the update path cannot touch it
        assert_eq!(profile.user.email, "a@x.com");
        let _ = store;
    }
}
