//! Current-account loader.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::domain::Account;
use crate::errors::AppError;
use crate::web::{AppState, Session};

/// Authenticated account resolved from the session.
#[derive(Clone, Debug)]
pub struct CurrentAccount {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_superuser: bool,
}

impl CurrentAccount {
    /// Name to greet the account with.
    pub fn display_name(&self) -> &str {
        if self.first_name.trim().is_empty() {
            &self.username
        } else {
            &self.first_name
        }
    }
}

impl From<&Account> for CurrentAccount {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            is_superuser: account.is_superuser,
        }
    }
}

/// Resolve the session's account and inject it into the request extensions.
///
/// A session pointing at a missing or inactive account is treated as anonymous.
pub async fn current_account_middleware(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(account_id) = session.account_id().await {
        match state.auth_service.session_account(account_id).await? {
            Some(account) => {
                request
                    .extensions_mut()
                    .insert(CurrentAccount::from(&account));
            }
            None => tracing::debug!(account_id, "Session account no longer usable"),
        }
    }

    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentAccount
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentAccount>()
            .cloned()
            .ok_or_else(|| AppError::internal("handler reached without an authenticated account"))
    }
}
