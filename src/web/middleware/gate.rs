//! Route gating by authentication state.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::CurrentAccount;

/// Access policy for a group of routes. Violations redirect; they never
/// produce an error page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Authenticated visitors are sent to `redirect_to`
    AnonymousOnly { redirect_to: &'static str },
    /// Anonymous visitors are sent to `login_url`
    LoginRequired { login_url: &'static str },
    /// Anyone but a superuser is sent to `login_url`
    SuperuserOnly { login_url: &'static str },
}

impl Gate {
    /// Redirect target for this visitor, or `None` to let the request through.
    pub fn check(&self, account: Option<&CurrentAccount>) -> Option<&'static str> {
        match (self, account) {
            (Gate::AnonymousOnly { redirect_to }, Some(_)) => Some(*redirect_to),
            (Gate::AnonymousOnly { .. }, None) => None,
            (Gate::LoginRequired { login_url }, None) => Some(*login_url),
            (Gate::LoginRequired { .. }, Some(_)) => None,
            (Gate::SuperuserOnly { login_url }, None) => Some(*login_url),
            (Gate::SuperuserOnly { login_url }, Some(acc)) if !acc.is_superuser => {
                Some(*login_url)
            }
            (Gate::SuperuserOnly { .. }, Some(_)) => None,
        }
    }
}

/// Middleware applying a [`Gate`]; install with `from_fn_with_state(gate, enforce_gate)`.
pub async fn enforce_gate(
    State(gate): State<Gate>,
    account: Option<CurrentAccount>,
    request: Request,
    next: Next,
) -> Response {
    match gate.check(account.as_ref()) {
        Some(target) => {
            tracing::debug!(path = %request.uri().path(), redirect = target, "Gate redirect");
            Redirect::to(target).into_response()
        }
        None => next.run(request).await,
    }
}
