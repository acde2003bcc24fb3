//! Error types for the pagination engine.

use polypage_db::DbError;
use polypage_query::QueryError;
use thiserror::Error;

/// Result type for pagination operations.
pub type PaginationResult<T> = Result<T, PaginationError>;

/// Errors raised by the pagination engine.
///
/// Configuration errors are raised immediately. Failures of the database or
/// the query builder propagate unchanged. A row whose entity could not be
/// loaded is not an error; it surfaces as [`PageItem::Missing`](crate::PageItem::Missing).
#[derive(Debug, Error)]
pub enum PaginationError {
    /// An entity type cannot produce a query or does not expose a usable key.
    #[error("invalid entity type: {0}")]
    InvalidEntityType(String),

    /// Pagination was attempted before any entity type was registered.
    #[error("no entity types registered")]
    NoEntityTypesRegistered,

    /// `per_page` was zero.
    #[error("invalid page size: {0}")]
    InvalidPageSize(u64),

    /// A configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Database(#[from] DbError),

    #[error(transparent)]
    Query(#[from] QueryError),
}
