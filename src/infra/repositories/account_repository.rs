//! Account repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::{Expr, Func, LikeExpr},
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, SqlErr,
};

use super::entities::account::{self, ActiveModel, Entity as AccountEntity};
use crate::domain::{Account, AccountChanges, NewAccount};
use crate::errors::{AppError, AppResult};
use crate::types::{DirectoryQuery, Page, SortColumn};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Message shown when a username is already registered.
pub const USERNAME_TAKEN: &str = "A user with that username already exists.";

/// Account repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find account by primary key
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Account>>;

    /// Find account by exact username
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>>;

    /// Whether a username is in use, ignoring case. `exclude` skips one
    /// account (the one being edited).
    async fn username_taken(&self, username: &str, exclude: Option<i32>) -> AppResult<bool>;

    /// Insert a new account
    async fn create(&self, account: NewAccount) -> AppResult<Account>;

    /// Replace profile fields and role flags
    async fn update(&self, id: i32, changes: AccountChanges) -> AppResult<Account>;

    /// Record a successful login
    async fn touch_last_login(&self, id: i32, at: DateTime<Utc>) -> AppResult<()>;

    /// Permanently delete an account
    async fn delete(&self, id: i32) -> AppResult<()>;

    /// Total number of accounts
    async fn count(&self) -> AppResult<u64>;

    /// Accounts whose `date_joined` is at or after `since`
    async fn count_joined_since(&self, since: DateTime<Utc>) -> AppResult<u64>;

    /// Most recently joined accounts, newest first
    async fn recent(&self, limit: u64) -> AppResult<Vec<Account>>;

    /// Filtered, ordered page of accounts
    async fn search(&self, query: &DirectoryQuery) -> AppResult<Page<Account>>;
}

/// Concrete implementation of AccountRepository
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn lower_username_eq(username: &str) -> sea_orm::sea_query::SimpleExpr {
        Expr::expr(Func::lower(Expr::col(account::Column::Username))).eq(username.to_lowercase())
    }

    fn filtered(query: &DirectoryQuery) -> Select<AccountEntity> {
        let mut select = AccountEntity::find();

        // SQLite's LOWER() folds ASCII only, so the exact-text branch is what
        // matches non-ASCII letters there, in the case they were typed.
        if let (Some(lowered), Some(exact)) = (query.like_pattern(), query.exact_like_pattern()) {
            let condition = [
                account::Column::Username,
                account::Column::Email,
                account::Column::FirstName,
                account::Column::LastName,
            ]
            .into_iter()
            .fold(Condition::any(), |cond, column| {
                cond.add(
                    Expr::expr(Func::lower(Expr::col(column)))
                        .like(LikeExpr::new(lowered.clone()).escape('\\')),
                )
                .add(Expr::col(column).like(LikeExpr::new(exact.clone()).escape('\\')))
            });
            select = select.filter(condition);
        }

        let column = match query.sort.column() {
            SortColumn::Username => account::Column::Username,
            SortColumn::DateJoined => account::Column::DateJoined,
            SortColumn::Email => account::Column::Email,
            SortColumn::LastLogin => account::Column::LastLogin,
        };
        let order = if query.sort.is_descending() {
            Order::Desc
        } else {
            Order::Asc
        };

        select
            .order_by(column, order.clone())
            .order_by(account::Column::Id, order)
    }
}

/// Map a unique-index violation on insert/update to the username field error.
fn map_write_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::field("username", USERNAME_TAKEN),
        _ => AppError::from(err),
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Account>> {
        let result = AccountEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Account::from))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        let result = AccountEntity::find()
            .filter(account::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        Ok(result.map(Account::from))
    }

    async fn username_taken(&self, username: &str, exclude: Option<i32>) -> AppResult<bool> {
        let mut select = AccountEntity::find().filter(Self::lower_username_eq(username));
        if let Some(id) = exclude {
            select = select.filter(account::Column::Id.ne(id));
        }

        Ok(select.count(&self.db).await? > 0)
    }

    async fn create(&self, new: NewAccount) -> AppResult<Account> {
        let active_model = ActiveModel {
            username: Set(new.username),
            first_name: Set(new.first_name),
            last_name: Set(new.last_name),
            email: Set(new.email),
            password_hash: Set(new.password_hash),
            is_active: Set(new.roles.is_active),
            is_staff: Set(new.roles.is_staff),
            is_superuser: Set(new.roles.is_superuser),
            date_joined: Set(new.date_joined),
            last_login: Set(None),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(map_write_error)?;
        Ok(Account::from(model))
    }

    async fn update(&self, id: i32, changes: AccountChanges) -> AppResult<Account> {
        let existing = AccountEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        active.username = Set(changes.username);
        active.first_name = Set(changes.first_name);
        active.last_name = Set(changes.last_name);
        active.email = Set(changes.email);
        active.is_active = Set(changes.roles.is_active);
        active.is_staff = Set(changes.roles.is_staff);
        active.is_superuser = Set(changes.roles.is_superuser);

        let model = active.update(&self.db).await.map_err(map_write_error)?;
        Ok(Account::from(model))
    }

    async fn touch_last_login(&self, id: i32, at: DateTime<Utc>) -> AppResult<()> {
        AccountEntity::update_many()
            .col_expr(account::Column::LastLogin, Expr::value(Some(at)))
            .filter(account::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        Ok(())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = AccountEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(AccountEntity::find().count(&self.db).await?)
    }

    async fn count_joined_since(&self, since: DateTime<Utc>) -> AppResult<u64> {
        let count = AccountEntity::find()
            .filter(account::Column::DateJoined.gte(since))
            .count(&self.db)
            .await?;

        Ok(count)
    }

    async fn recent(&self, limit: u64) -> AppResult<Vec<Account>> {
        let models = AccountEntity::find()
            .order_by_desc(account::Column::DateJoined)
            .order_by_desc(account::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Account::from).collect())
    }

    async fn search(&self, query: &DirectoryQuery) -> AppResult<Page<Account>> {
        let per_page = query.page.per_page;
        let paginator = Self::filtered(query).paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let number = query.page.clamp(total);

        let models = paginator.fetch_page(number - 1).await?;
        let items = models.into_iter().map(Account::from).collect();

        Ok(Page::new(items, number, per_page, total))
    }
}
