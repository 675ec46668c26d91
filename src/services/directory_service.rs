//! Directory service - Superuser management of accounts.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Arc;

use super::auth_service::insert_account;
use crate::config::{DASHBOARD_RECENT_LIMIT, NEW_SIGNUP_WINDOW_DAYS};
use crate::domain::{Account, AccountChanges, AccountDraft, DashboardStats};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{AccountRepository, USERNAME_TAKEN};
use crate::types::{DirectoryQuery, Page};

/// Directory service trait for dependency injection.
#[async_trait]
pub trait DirectoryService: Send + Sync {
    /// Totals and recent signups for the dashboard
    async fn dashboard(&self) -> AppResult<DashboardStats>;

    /// Searchable, sortable, paginated listing
    async fn list_accounts(&self, query: &DirectoryQuery) -> AppResult<Page<Account>>;

    /// Get account by ID
    async fn get_account(&self, id: i32) -> AppResult<Account>;

    /// Create an account with explicit role flags
    async fn create_account(&self, draft: AccountDraft) -> AppResult<Account>;

    /// Apply an administrator's edits
    async fn update_account(&self, id: i32, changes: AccountChanges) -> AppResult<Account>;

    /// Load the target and apply the deletion guards without deleting
    async fn check_deletable(&self, actor_id: i32, id: i32) -> AppResult<Account>;

    /// Delete after re-checking the guards; returns the removed account
    async fn delete_account(&self, actor_id: i32, id: i32) -> AppResult<Account>;
}

/// Concrete implementation of DirectoryService.
pub struct DirectoryManager {
    accounts: Arc<dyn AccountRepository>,
}

impl DirectoryManager {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }
}

/// Deletion guards: never the acting admin, never a superuser.
fn ensure_deletable(actor_id: i32, target: &Account) -> AppResult<()> {
    if target.id == actor_id {
        return Err(AppError::policy(
            "You cannot delete your own active admin account.",
        ));
    }
    if target.is_superuser {
        return Err(AppError::policy(format!(
            "Cannot delete the primary Superuser: {}.",
            target.username
        )));
    }
    Ok(())
}

#[async_trait]
impl DirectoryService for DirectoryManager {
    async fn dashboard(&self) -> AppResult<DashboardStats> {
        let since = Utc::now() - Duration::days(NEW_SIGNUP_WINDOW_DAYS);

        let (total_accounts, joined_last_30_days, recent) = tokio::try_join!(
            self.accounts.count(),
            self.accounts.count_joined_since(since),
            self.accounts.recent(DASHBOARD_RECENT_LIMIT),
        )?;

        Ok(DashboardStats {
            total_accounts,
            joined_last_30_days,
            recent,
        })
    }

    async fn list_accounts(&self, query: &DirectoryQuery) -> AppResult<Page<Account>> {
        self.accounts.search(query).await
    }

    async fn get_account(&self, id: i32) -> AppResult<Account> {
        self.accounts.find_by_id(id).await?.ok_or_not_found()
    }

    async fn create_account(&self, draft: AccountDraft) -> AppResult<Account> {
        let account = insert_account(self.accounts.as_ref(), draft).await?;
        tracing::info!(account_id = account.id, username = %account.username, "Account created by admin");
        Ok(account)
    }

    async fn update_account(&self, id: i32, changes: AccountChanges) -> AppResult<Account> {
        self.get_account(id).await?;

        if self
            .accounts
            .username_taken(&changes.username, Some(id))
            .await?
        {
            return Err(AppError::field("username", USERNAME_TAKEN));
        }

        let account = self.accounts.update(id, changes).await?;
        tracing::info!(account_id = account.id, "Account updated by admin");
        Ok(account)
    }

    async fn check_deletable(&self, actor_id: i32, id: i32) -> AppResult<Account> {
        let target = self.get_account(id).await?;
        if let Err(err) = ensure_deletable(actor_id, &target) {
            tracing::warn!(actor_id, target_id = id, "Blocked account deletion");
            return Err(err);
        }
        Ok(target)
    }

    async fn delete_account(&self, actor_id: i32, id: i32) -> AppResult<Account> {
        let target = self.check_deletable(actor_id, id).await?;
        self.accounts.delete(id).await?;
        tracing::info!(actor_id, target_id = id, username = %target.username, "Account deleted");
        Ok(target)
    }
}
