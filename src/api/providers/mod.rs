//! Providers attach one cross-cutting concern each to the router.
//!
//! They run in order, so a later provider's layers wrap everything an
//! earlier one registered.

mod exception;
mod logging;
mod route;

use axum::Router;

use crate::api::AppState;

pub use exception::ExceptionProvider;
pub use logging::LoggingProvider;
pub use route::RouteProvider;

/// Startup registration hook
pub trait Provider: Send + Sync {
    fn name(&self) -> &'static str;

    fn register(&self, router: Router<AppState>, state: &AppState) -> Router<AppState>;
}

/// Routes first, then exception handling, then logging outermost.
pub fn default_providers() -> Vec<Box<dyn Provider>> {
    vec![
        Box::new(RouteProvider),
        Box::new(ExceptionProvider),
        Box::new(LoggingProvider),
    ]
}
