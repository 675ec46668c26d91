//! Per-request session handle.
//!
//! The session middleware loads the record named by the `sessionid` cookie,
//! hands handlers a [`Session`] through request extensions and persists the
//! record after the handler returns, but only when something changed.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts, HeaderMap, HeaderValue},
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::{Config, SESSION_COOKIE_NAME};
use crate::errors::{AppError, AppResult};
use crate::infra::{Flash, FlashLevel, SessionRecord};

/// Cookie and lifetime settings for sessions.
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub ttl_seconds: u64,
    pub cookie_secure: bool,
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            ttl_seconds: config.session_ttl_seconds,
            cookie_secure: config.session_cookie_secure,
        }
    }
}

/// Random opaque token used for session keys and CSRF tokens.
pub(crate) fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

#[derive(Debug, Default)]
struct SessionState {
    /// Key the record is stored under; `None` until first saved or after rotation
    key: Option<String>,
    record: SessionRecord,
    modified: bool,
    /// Keys retired by rotation or flush, to be removed from the store
    stale_keys: Vec<String>,
}

/// Snapshot handed back to the middleware once the handler is done.
#[derive(Debug)]
pub(crate) struct SessionCommit {
    pub key: Option<String>,
    pub record: SessionRecord,
    pub modified: bool,
    pub stale_keys: Vec<String>,
}

/// Shared handle to the current request's session.
#[derive(Clone, Debug)]
pub struct Session {
    inner: Arc<Mutex<SessionState>>,
}

impl Session {
    pub(crate) fn new(key: Option<String>, record: SessionRecord) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionState {
                key,
                record,
                ..SessionState::default()
            })),
        }
    }

    /// Authenticated account id, if any.
    pub async fn account_id(&self) -> Option<i32> {
        self.inner.lock().await.record.account_id
    }

    /// Bind the session to `account_id`, rotating the session key and the
    /// CSRF token. Pending flash messages survive.
    pub async fn login(&self, account_id: i32) {
        let mut state = self.inner.lock().await;
        if let Some(old) = state.key.take() {
            state.stale_keys.push(old);
        }
        state.record.account_id = Some(account_id);
        state.record.csrf_token = Some(new_token());
        state.modified = true;
    }

    /// Drop everything in the session and retire its key.
    pub async fn logout(&self) {
        let mut state = self.inner.lock().await;
        if let Some(old) = state.key.take() {
            state.stale_keys.push(old);
        }
        state.record = SessionRecord::default();
        state.modified = true;
    }

    pub async fn flash(&self, level: FlashLevel, message: impl Into<String>) {
        let mut state = self.inner.lock().await;
        state.record.flashes.push(Flash {
            level,
            message: message.into(),
        });
        state.modified = true;
    }

    pub async fn success(&self, message: impl Into<String>) {
        self.flash(FlashLevel::Success, message).await;
    }

    pub async fn error(&self, message: impl Into<String>) {
        self.flash(FlashLevel::Error, message).await;
    }

    /// Drain queued flash messages.
    pub async fn take_flashes(&self) -> Vec<Flash> {
        let mut state = self.inner.lock().await;
        if state.record.flashes.is_empty() {
            return Vec::new();
        }
        state.modified = true;
        std::mem::take(&mut state.record.flashes)
    }

    /// CSRF token for rendered forms, created on first use.
    pub async fn csrf_token(&self) -> String {
        let mut state = self.inner.lock().await;
        if let Some(token) = &state.record.csrf_token {
            return token.clone();
        }
        let token = new_token();
        state.record.csrf_token = Some(token.clone());
        state.modified = true;
        token
    }

    /// Whether a submitted token matches the session's token.
    pub async fn verify_csrf(&self, submitted: &str) -> bool {
        let state = self.inner.lock().await;
        match &state.record.csrf_token {
            Some(expected) => !submitted.is_empty() && expected == submitted,
            None => false,
        }
    }

    pub(crate) async fn commit(&self) -> SessionCommit {
        let mut state = self.inner.lock().await;
        SessionCommit {
            key: state.key.clone(),
            record: state.record.clone(),
            modified: state.modified,
            stale_keys: std::mem::take(&mut state.stale_keys),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::internal("session middleware is not installed"))
    }
}

/// Read the session key from the `Cookie` header.
pub(crate) fn read_session_cookie(headers: &HeaderMap) -> Option<String> {
    for header in headers.get_all(COOKIE) {
        let Ok(value) = header.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            let mut parts = pair.trim().splitn(2, '=');
            let name = parts.next().unwrap_or_default().trim();
            let Some(val) = parts.next() else {
                continue;
            };
            let val = val.trim();
            if name == SESSION_COOKIE_NAME && is_well_formed_key(val) {
                return Some(val.to_string());
            }
        }
    }
    None
}

fn is_well_formed_key(value: &str) -> bool {
    value.len() == 32 && value.chars().all(|c| c.is_ascii_hexdigit())
}

/// Build the `Set-Cookie` value for a live session.
pub(crate) fn session_cookie(key: &str, settings: &SessionSettings) -> AppResult<HeaderValue> {
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={key}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        settings.ttl_seconds
    );
    if settings.cookie_secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).map_err(|e| AppError::internal(format!("Bad cookie: {e}")))
}

/// Build the `Set-Cookie` value that expires the session cookie.
pub(crate) fn clear_session_cookie(settings: &SessionSettings) -> AppResult<HeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if settings.cookie_secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).map_err(|e| AppError::internal(format!("Bad cookie: {e}")))
}
