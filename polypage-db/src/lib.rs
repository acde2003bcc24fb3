//! SQLite execution layer for polypage.
//!
//! Provides the two capabilities the pagination engine consumes:
//! - [`QueryRunner`]: executes rendered [`Statement`](polypage_query::Statement)s
//!   (counts and row fetches) against one database
//! - [`Repository`]: bulk-loads fully typed entities by a list of ids
//!
//! [`Database`] implements `QueryRunner` over a shared `rusqlite` connection,
//! and [`SqliteRepository`] implements `Repository` for a single table with a
//! caller-supplied row mapper.

mod database;
mod error;
mod repository;
mod runner;

pub use database::Database;
pub use error::{DbError, DbResult};
pub use repository::{Repository, SqliteRepository, MAX_IDS_PER_QUERY};
pub use runner::QueryRunner;
