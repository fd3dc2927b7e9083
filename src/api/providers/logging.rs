use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use super::Provider;
use crate::api::middleware::request_log_middleware;
use crate::api::AppState;

/// Access log line per request plus `tower-http` tracing spans.
pub struct LoggingProvider;

impl Provider for LoggingProvider {
    fn name(&self) -> &'static str {
        "LoggingProvider"
    }

    fn register(&self, router: Router<AppState>, _state: &AppState) -> Router<AppState> {
        router
            .layer(middleware::from_fn(request_log_middleware))
            .layer(TraceLayer::new_for_http())
    }
}
