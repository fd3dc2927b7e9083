//! Shared response and pagination types.

mod pagination;
mod response;

pub use pagination::{Paginated, PaginationMeta, PaginationParams, ProductPage};
pub use response::{ApiResponse, Created};
