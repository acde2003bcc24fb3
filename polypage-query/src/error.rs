//! Error types for query building.

use thiserror::Error;

/// Result type for query building.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while building or rendering a query.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// A table, column or alias name is not a plain SQL identifier.
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// A raw SQL fragment has a different number of `?` placeholders than binds.
    #[error("raw fragment expects {expected} binds, got {found}")]
    BindCountMismatch { expected: usize, found: usize },

    /// An ORDER BY term names a column the union does not output.
    #[error("unknown order column: {0:?}")]
    UnknownColumn(String),

    /// A union was requested with no branches.
    #[error("union has no branches")]
    EmptyUnion,
}
