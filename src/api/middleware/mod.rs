//! API middleware.

mod auth;
mod error_envelope;
mod request_log;

pub use auth::{auth_middleware, CurrentUser};
pub use error_envelope::{envelope_http_errors, not_found_fallback, panic_response};
pub use request_log::{client_ip, request_log_middleware};
