//! Authentication service - Registration, credential checks and login bookkeeping.
//!
//! Password hashing lives in the domain `Password` value object; this
//! service only orchestrates it against the repository.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use crate::domain::{Account, AccountDraft, NewAccount, Password};
use crate::errors::{AppError, AppResult};
use crate::infra::{AccountRepository, USERNAME_TAKEN};

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new account
    async fn register(&self, draft: AccountDraft) -> AppResult<Account>;

    /// Check a username/password pair. Inactive accounts never authenticate.
    async fn authenticate(&self, username: &str, password: &str) -> AppResult<Account>;

    /// Stamp `last_login` after a successful login
    async fn record_login(&self, account_id: i32) -> AppResult<()>;

    /// Resolve the account behind a session; `None` when missing or inactive
    async fn session_account(&self, account_id: i32) -> AppResult<Option<Account>>;
}

/// Hash the draft's password and insert it, enforcing case-insensitive
/// username uniqueness. Shared by signup, admin create and the CLI.
pub(crate) async fn insert_account(
    accounts: &dyn AccountRepository,
    draft: AccountDraft,
) -> AppResult<Account> {
    if accounts.username_taken(&draft.username, None).await? {
        return Err(AppError::field("username", USERNAME_TAKEN));
    }

    let password_hash = Password::new(&draft.password)?.into_string();

    accounts
        .create(NewAccount {
            username: draft.username,
            first_name: draft.first_name,
            last_name: draft.last_name,
            email: draft.email,
            password_hash,
            roles: draft.roles,
            date_joined: Utc::now(),
        })
        .await
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    accounts: Arc<dyn AccountRepository>,
}

impl Authenticator {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, draft: AccountDraft) -> AppResult<Account> {
        let account = insert_account(self.accounts.as_ref(), draft).await?;
        tracing::info!(account_id = account.id, username = %account.username, "Account registered");
        Ok(account)
    }

    async fn authenticate(&self, username: &str, password: &str) -> AppResult<Account> {
        let found = self.accounts.find_by_username(username).await?;

        // Verify even when the account is missing so response time does not
        // reveal which usernames exist.
        let stored = match &found {
            Some(account) => Password::from_hash(account.password_hash.clone()),
            None => Password::unusable(),
        };
        let password_valid = stored.verify(password);

        match found {
            Some(account) if password_valid && account.is_active => Ok(account),
            _ => {
                tracing::warn!(username = %username, "Failed login attempt");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    async fn record_login(&self, account_id: i32) -> AppResult<()> {
        self.accounts.touch_last_login(account_id, Utc::now()).await
    }

    async fn session_account(&self, account_id: i32) -> AppResult<Option<Account>> {
        let account = self.accounts.find_by_id(account_id).await?;
        Ok(account.filter(|a| a.is_active))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RoleFlags;
    use crate::infra::MockAccountRepository;
    use mockall::predicate::*;

    fn account_with_password(plain: &str, is_active: bool) -> Account {
        Account {
            id: 4,
            username: "alice".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: Password::new(plain).unwrap().into_string(),
            is_active,
            is_staff: false,
            is_superuser: false,
            date_joined: Utc::now(),
            last_login: None,
        }
    }

    fn draft(username: &str, password: &str) -> AccountDraft {
        AccountDraft {
            username: username.to_string(),
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
            email: "alice@example.com".to_string(),
            password: password.to_string(),
            roles: RoleFlags::member(),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let mut repo = MockAccountRepository::new();
        repo.expect_username_taken()
            .with(eq("alice"), eq(None))
            .returning(|_, _| Ok(false));
        repo.expect_create()
            .withf(|new| {
                new.username == "alice"
                    && new.password_hash.starts_with("$argon2")
                    && new.roles == RoleFlags::member()
            })
            .returning(|new| {
                Ok(Account {
                    id: 1,
                    username: new.username,
                    first_name: new.first_name,
                    last_name: new.last_name,
                    email: new.email,
                    password_hash: new.password_hash,
                    is_active: true,
                    is_staff: false,
                    is_superuser: false,
                    date_joined: new.date_joined,
                    last_login: None,
                })
            });

        let service = Authenticator::new(Arc::new(repo));
        let account = service.register(draft("alice", "wonderland42")).await.unwrap();

        assert_eq!(account.id, 1);
        assert!(Password::from_hash(account.password_hash).verify("wonderland42"));
    }

    #[tokio::test]
    async fn test_register_rejects_taken_username() {
        let mut repo = MockAccountRepository::new();
        repo.expect_username_taken().returning(|_, _| Ok(true));
        repo.expect_create().never();

        let service = Authenticator::new(Arc::new(repo));
        let err = service
            .register(draft("ALICE", "wonderland42"))
            .await
            .unwrap_err();

        match err {
            AppError::Validation(errors) => {
                assert_eq!(errors.get("username"), [USERNAME_TAKEN.to_string()])
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let account = account_with_password("wonderland42", true);
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_username()
            .with(eq("alice"))
            .returning(move |_| Ok(Some(account.clone())));

        let service = Authenticator::new(Arc::new(repo));
        let found = service.authenticate("alice", "wonderland42").await.unwrap();
        assert_eq!(found.username, "alice");
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let account = account_with_password("wonderland42", true);
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_username()
            .returning(move |_| Ok(Some(account.clone())));

        let service = Authenticator::new(Arc::new(repo));
        let result = service.authenticate("alice", "looking-glass").await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_user() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_username().returning(|_| Ok(None));

        let service = Authenticator::new(Arc::new(repo));
        let result = service.authenticate("nobody", "whatever123").await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_authenticate_inactive_account() {
        let account = account_with_password("wonderland42", false);
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_username()
            .returning(move |_| Ok(Some(account.clone())));

        let service = Authenticator::new(Arc::new(repo));
        let result = service.authenticate("alice", "wonderland42").await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_session_account_ignores_inactive() {
        let account = account_with_password("wonderland42", false);
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id()
            .with(eq(4))
            .returning(move |_| Ok(Some(account.clone())));

        let service = Authenticator::new(Arc::new(repo));
        assert!(service.session_account(4).await.unwrap().is_none());
    }
}
