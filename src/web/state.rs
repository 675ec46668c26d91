//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use super::session::SessionSettings;
use crate::config::Config;
use crate::infra::{Database, SessionStore};
use crate::services::{AuthService, DirectoryService, ServiceContainer, Services};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// Account directory service
    pub directory_service: Arc<dyn DirectoryService>,
    /// Session persistence
    pub sessions: Arc<dyn SessionStore>,
    /// Database connection
    pub database: Arc<Database>,
    /// Cookie and lifetime settings
    pub session_settings: SessionSettings,
}

impl AppState {
    /// Create application state from database connection, session store and config.
    pub fn from_config(
        database: Arc<Database>,
        sessions: Arc<dyn SessionStore>,
        config: &Config,
    ) -> Self {
        let container = Services::from_connection(database.get_connection());
        Self::new(&container, sessions, database, SessionSettings::from(config))
    }

    /// Create application state from an explicit service container.
    pub fn new(
        services: &dyn ServiceContainer,
        sessions: Arc<dyn SessionStore>,
        database: Arc<Database>,
        session_settings: SessionSettings,
    ) -> Self {
        Self {
            auth_service: services.auth(),
            directory_service: services.directory(),
            sessions,
            database,
            session_settings,
        }
    }
}
