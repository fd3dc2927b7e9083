//! Domain layer - Core business entities
//!
//! Plain types independent of the database and HTTP layers.

pub mod password;
pub mod product;
pub mod user;

pub use password::Password;
pub use product::{NewProduct, Product, ProductChanges, ProductResponse};
pub use user::{Gender, NewUser, ProfileChanges, User, UserDetail, UserState};
