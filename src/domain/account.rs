//! Account domain entity and related types.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Role label derived from the account flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AccountRole {
    Superuser,
    Staff,
    Standard,
}

impl AccountRole {
    pub fn label(&self) -> &'static str {
        match self {
            AccountRole::Superuser => "Superuser",
            AccountRole::Staff => "Staff",
            AccountRole::Standard => "Standard User",
        }
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Account domain entity
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl Account {
    pub fn role(&self) -> AccountRole {
        if self.is_superuser {
            AccountRole::Superuser
        } else if self.is_staff {
            AccountRole::Staff
        } else {
            AccountRole::Standard
        }
    }

    /// "First Last", or the username when both names are blank.
    pub fn full_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Role flags set by an administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleFlags {
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl RoleFlags {
    /// Flags of a self-registered account.
    pub fn member() -> Self {
        Self {
            is_active: true,
            is_staff: false,
            is_superuser: false,
        }
    }

    pub fn superuser() -> Self {
        Self {
            is_active: true,
            is_staff: true,
            is_superuser: true,
        }
    }
}

/// Validated registration input, password still in plain text.
#[derive(Debug, Clone)]
pub struct AccountDraft {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub roles: RoleFlags,
}

/// Account ready for insertion; password already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub roles: RoleFlags,
    pub date_joined: DateTime<Utc>,
}

/// Profile and role changes applied by an administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountChanges {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub roles: RoleFlags,
}

/// Dashboard figures
#[derive(Debug, Clone)]
pub struct DashboardStats {
    pub total_accounts: u64,
    pub joined_last_30_days: u64,
    pub recent: Vec<Account>,
}
