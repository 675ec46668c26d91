//! Server-side session storage.
//!
//! Records are keyed by the opaque value of the session cookie. Redis is the
//! production backend; the in-memory map serves development and tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::Cache;
use crate::config::{Config, SessionBackend};
use crate::errors::AppResult;

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Error => "error",
        }
    }
}

/// One-shot notice shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

/// Persisted session contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flashes: Vec<Flash>,
}

impl SessionRecord {
    pub fn is_empty(&self) -> bool {
        self.account_id.is_none() && self.csrf_token.is_none() && self.flashes.is_empty()
    }
}

/// Session persistence backend.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, key: &str) -> AppResult<Option<SessionRecord>>;

    /// Insert or replace a record, resetting its expiry.
    async fn save(&self, key: &str, record: &SessionRecord, ttl_seconds: u64) -> AppResult<()>;

    async fn remove(&self, key: &str) -> AppResult<()>;

    /// Reachability check for the health endpoint.
    async fn ping(&self) -> AppResult<()>;
}

/// Sessions kept in Redis under the `session:` prefix.
pub struct RedisSessionStore {
    cache: Cache,
}

impl RedisSessionStore {
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, key: &str) -> AppResult<Option<SessionRecord>> {
        self.cache.get_session(key).await
    }

    async fn save(&self, key: &str, record: &SessionRecord, ttl_seconds: u64) -> AppResult<()> {
        self.cache.set_session(key, record, ttl_seconds).await
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.cache.delete_session(key).await
    }

    async fn ping(&self) -> AppResult<()> {
        self.cache.ping().await
    }
}

/// Process-local sessions with expiry.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, (SessionRecord, Instant)>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) sessions.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|(_, expires)| *expires > now)
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, key: &str) -> AppResult<Option<SessionRecord>> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some((record, expires)) if *expires > now => return Ok(Some(record.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // expired
        self.entries.write().await.remove(key);
        Ok(None)
    }

    async fn save(&self, key: &str, record: &SessionRecord, ttl_seconds: u64) -> AppResult<()> {
        let expires = Instant::now() + Duration::from_secs(ttl_seconds);
        let mut entries = self.entries.write().await;
        entries.retain(|_, (_, at)| *at > Instant::now());
        entries.insert(key.to_string(), (record.clone(), expires));
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Build the session store selected by configuration.
pub async fn connect_session_store(config: &Config) -> AppResult<Arc<dyn SessionStore>> {
    match config.session_backend {
        SessionBackend::Redis => {
            let cache = Cache::try_connect(config).await?;
            Ok(Arc::new(RedisSessionStore::new(cache)))
        }
        SessionBackend::Memory => {
            tracing::warn!("Using in-memory session store; sessions are lost on restart");
            Ok(Arc::new(MemorySessionStore::new()))
        }
    }
}
