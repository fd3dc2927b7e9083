//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{AuthService, ProductService, ServiceContainer, Services, UserService};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub product_service: Arc<dyn ProductService>,
    pub database: Arc<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Build the default services over the given database.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config.clone());
        Self::new(&container, database, config)
    }

    /// Take services from any container (mocks included).
    pub fn new(container: &dyn ServiceContainer, database: Arc<Database>, config: Config) -> Self {
        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            product_service: container.products(),
            database,
            config: Arc::new(config),
        }
    }
}
