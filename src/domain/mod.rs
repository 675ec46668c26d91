//! Domain layer - Core business entities and rules
//!
//! Independent of the web and storage layers.

pub mod account;
pub mod password;
pub mod validation;

pub use account::{
    Account, AccountChanges, AccountDraft, AccountRole, DashboardStats, NewAccount, RoleFlags,
};
pub use password::{Password, NEW_PASSWORD_FIELD};
