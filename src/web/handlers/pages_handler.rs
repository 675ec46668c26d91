//! Landing and post-login pages.

use axum::response::Html;

use crate::errors::AppResult;
use crate::web::middleware::CurrentAccount;
use crate::web::templates::{self, PageContext};
use crate::web::Session;

/// Landing page for anonymous visitors.
pub async fn welcome(session: Session) -> AppResult<Html<String>> {
    let ctx = PageContext::load(&session, None).await;
    Ok(templates::welcome_page(&ctx))
}

pub async fn home(session: Session, account: CurrentAccount) -> AppResult<Html<String>> {
    let ctx = PageContext::load(&session, Some(account.clone())).await;
    Ok(templates::home_page(&ctx, &account))
}
