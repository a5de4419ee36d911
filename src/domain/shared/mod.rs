//! Building blocks shared by every bounded context

pub mod pagination;
pub mod repository;

pub use pagination::{Page, Pagination, PaginationParams};
pub use repository::{Entity, EntityId, Repository, RepositoryError};
