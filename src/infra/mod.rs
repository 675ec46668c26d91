//! Infrastructure layer - External systems integration
//!
//! - Database connection, migrations and repositories
//! - Redis cache
//! - Session storage

pub mod cache;
pub mod db;
pub mod repositories;
pub mod session_store;

pub use cache::Cache;
pub use db::{Database, Migrator};
pub use repositories::{AccountRepository, AccountStore, USERNAME_TAKEN};
pub use session_store::{
    connect_session_store, Flash, FlashLevel, MemorySessionStore, RedisSessionStore,
    SessionRecord, SessionStore,
};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockAccountRepository;
