//! Numeric account id path parameter.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::errors::AppError;

/// `:id` segment made of ASCII digits only; anything else is a 404,
/// matching a route table that would not have matched the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountId(pub i32);

impl AccountId {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        raw.parse().ok().map(AccountId)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AccountId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound)?;

        AccountId::parse(&raw).ok_or(AppError::NotFound)
    }
}
