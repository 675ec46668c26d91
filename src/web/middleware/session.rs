//! Session load/persist middleware.

use axum::{
    extract::{Request, State},
    http::header::SET_COOKIE,
    middleware::Next,
    response::Response,
};

use crate::errors::AppError;
use crate::infra::SessionRecord;
use crate::web::session::{
    clear_session_cookie, new_token, read_session_cookie, session_cookie, Session,
};
use crate::web::AppState;

/// Load the session named by the cookie, run the handler, then persist
/// whatever the handler changed.
///
/// - Unknown or expired keys start a fresh, unsaved session.
/// - A modified session that ends up empty is removed and its cookie cleared.
/// - Keys retired by login or logout are removed from the store.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let incoming = read_session_cookie(request.headers());

    let loaded = match &incoming {
        Some(key) => state.sessions.load(key).await?,
        None => None,
    };
    let session = match loaded {
        Some(record) => Session::new(incoming.clone(), record),
        None => Session::new(None, SessionRecord::default()),
    };

    request.extensions_mut().insert(session.clone());
    let mut response = next.run(request).await;

    let commit = session.commit().await;
    for stale in &commit.stale_keys {
        state.sessions.remove(stale).await?;
    }

    if !commit.modified {
        return Ok(response);
    }

    let settings = &state.session_settings;
    if commit.record.is_empty() {
        if let Some(key) = &commit.key {
            state.sessions.remove(key).await?;
        }
        if incoming.is_some() {
            response
                .headers_mut()
                .append(SET_COOKIE, clear_session_cookie(settings)?);
        }
    } else {
        let key = commit.key.unwrap_or_else(new_token);
        state
            .sessions
            .save(&key, &commit.record, settings.ttl_seconds)
            .await?;
        response
            .headers_mut()
            .append(SET_COOKIE, session_cookie(&key, settings)?);
    }

    Ok(response)
}
