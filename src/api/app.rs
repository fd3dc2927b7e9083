//! Application factory.

use axum::Router;

use super::providers::{default_providers, Provider};
use super::AppState;

/// Build the application from the default providers.
pub fn create_app(state: AppState) -> Router {
    create_app_with(state, &default_providers())
}

/// Build the application from an explicit provider list.
pub fn create_app_with(state: AppState, providers: &[Box<dyn Provider>]) -> Router {
    let router = providers.iter().fold(Router::new(), |router, provider| {
        let router = provider.register(router, &state);
        tracing::info!("{} registered", provider.name());
        router
    });

    router.with_state(state)
}
