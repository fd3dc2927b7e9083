//! API layer - HTTP handlers and middleware
//!
//! - Application factory and providers
//! - Request handlers
//! - Middleware (authentication, access log, error envelope)
//! - Custom extractors

mod app;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod providers;
pub mod routes;
pub mod state;

pub use app::{create_app, create_app_with};
pub use openapi::ApiDoc;
pub use state::AppState;
