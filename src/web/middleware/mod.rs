//! HTTP middleware.

mod auth;
mod gate;
mod session;

pub use auth::{current_account_middleware, CurrentAccount};
pub use gate::{enforce_gate, Gate};
pub use session::session_middleware;
