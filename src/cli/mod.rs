//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `serve` - Start the HTTP server
//! - `migrate` - Database migrations
//! - `create-superuser` - Bootstrap a control panel account

pub mod args;

pub use args::{Cli, Commands};
