use axum::{middleware, Router};
use tower_http::catch_panic::CatchPanicLayer;

use super::Provider;
use crate::api::middleware::{envelope_http_errors, not_found_fallback, panic_response};
use crate::api::AppState;

/// JSON 404 fallback, panic catcher and error envelope rewriting.
pub struct ExceptionProvider;

impl Provider for ExceptionProvider {
    fn name(&self) -> &'static str {
        "ExceptionProvider"
    }

    fn register(&self, router: Router<AppState>, _state: &AppState) -> Router<AppState> {
        router
            .fallback(not_found_fallback)
            .layer(middleware::from_fn(envelope_http_errors))
            .layer(CatchPanicLayer::custom(panic_response))
    }
}
