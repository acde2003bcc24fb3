//! Core type definitions for polypage.
//!
//! This crate defines the storage-agnostic types shared by the query
//! builder, the SQLite execution layer and the pagination engine:
//! - [`Value`]: a single SQL scalar (null, integer, real, text, blob)
//! - [`Row`]: an ordered set of named column values as returned by a query
//! - [`Entity`]: anything that can be keyed by its primary-key value
//! - [`Record`]: a generic, JSON-backed entity for callers without bespoke structs
//!
//! Nothing here knows about unions or pages; those live in the `polypage` crate.

mod entity;
mod row;
mod value;

pub use entity::{Entity, Record};
pub use row::Row;
pub use value::{FromValue, Value};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("decode error: {0}")]
    Decode(String),
}
