//! Error types for the execution layer.

use thiserror::Error;

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Errors that can occur while executing queries or loading entities.
#[derive(Debug, Error)]
pub enum DbError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The statement could not be rendered.
    #[error("query error: {0}")]
    Query(#[from] polypage_query::QueryError),

    /// A row could not be decoded into the requested type.
    #[error(transparent)]
    Decode(#[from] polypage_types::Error),

    /// A statement returned a shape the caller did not expect.
    #[error("unexpected result: {0}")]
    UnexpectedResult(String),

    /// A previous holder of the connection panicked.
    #[error("connection lock poisoned")]
    LockPoisoned,

    /// Failure reported by a caller-implemented repository.
    #[error("repository error: {0}")]
    Repository(String),
}
