//! Service Container - Centralized service access.
//!
//! Handlers depend on the service traits; the container wires the concrete
//! implementations to a shared repository.

use std::sync::Arc;

use super::{AuthService, DirectoryService};
use crate::infra::{AccountRepository, AccountStore};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get directory service
    fn directory(&self) -> Arc<dyn DirectoryService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    directory_service: Arc<dyn DirectoryService>,
}

impl Services {
    /// Create a new service container with all services initialized
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        directory_service: Arc<dyn DirectoryService>,
    ) -> Self {
        Self {
            auth_service,
            directory_service,
        }
    }

    /// Build every service on top of one repository
    pub fn from_repository(accounts: Arc<dyn AccountRepository>) -> Self {
        use super::{Authenticator, DirectoryManager};

        Self::new(
            Arc::new(Authenticator::new(accounts.clone())),
            Arc::new(DirectoryManager::new(accounts)),
        )
    }

    /// Create service container from a database connection
    pub fn from_connection(db: sea_orm::DatabaseConnection) -> Self {
        Self::from_repository(Arc::new(AccountStore::new(db)))
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn directory(&self) -> Arc<dyn DirectoryService> {
        self.directory_service.clone()
    }
}
