//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod base;
pub mod product;
pub mod user;

pub use base::SoftDelete;
