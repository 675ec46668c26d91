//! Web layer - HTTP handlers, middleware and views
//!
//! This module contains all HTTP-related concerns:
//! - Request handlers
//! - Middleware (sessions, current account, route gates)
//! - Forms and custom extractors
//! - Server-rendered templates
//! - Route definitions

pub mod extractors;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod paths;
pub mod routes;
pub mod session;
pub mod state;
pub mod templates;

pub use routes::create_router;
pub use session::{Session, SessionSettings};
pub use state::AppState;
