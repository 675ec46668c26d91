//! Accounts portal - member accounts with a superuser control panel
//!
//! Server-rendered Axum application: public signup/login/logout pages and a
//! control panel where superusers search, create, edit and delete accounts.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Account entity, password hashing, field rules
//! - **services**: Authentication and directory use cases
//! - **infra**: Database, migrations, repositories, session storage
//! - **web**: Routes, gates, sessions, forms, handlers and templates
//! - **types**: Shared types (pagination, listing queries, field errors)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Bootstrap a control panel account
//! SUPERUSER_PASSWORD=... cargo run -- create-superuser --username root --email root@example.com
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;
pub mod web;

// Re-export commonly used types at crate root
pub use config::Config;
pub use domain::{Account, AccountRole, Password};
pub use errors::{AppError, AppResult};
pub use web::{create_router, AppState};
