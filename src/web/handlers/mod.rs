//! HTTP request handlers.

pub mod account_handler;
pub mod admin_handler;
pub mod health_handler;
pub mod pages_handler;
