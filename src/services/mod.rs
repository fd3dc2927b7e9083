//! Application services layer - Use cases and business logic.
//!
//! Services depend on repository traits through the Unit of Work, so the
//! tests can swap in mocks.

mod auth_service;
pub mod container;
mod product_service;
mod user_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use container::{ServiceContainer, Services};

pub use auth_service::{AuthService, Authenticator, Claims, Registration, TokenResponse};
pub use product_service::{ProductManager, ProductService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
