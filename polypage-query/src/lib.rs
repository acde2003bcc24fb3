//! SQL query building for polypage.
//!
//! Queries are built as small trees and only turned into SQL text when a
//! [`Statement`] is rendered for a [`Dialect`]. Rendering walks the tree in
//! the same order the SQL text is produced, pushing each bound value as its
//! placeholder is written. Bind order therefore always matches the lexical
//! order of placeholders, however deeply a query is nested inside a union
//! or an outer paginating query.
//!
//! # Example
//!
//! ```
//! use polypage_query::{col, Dialect, SelectItem, SelectQuery};
//!
//! let mut query = SelectQuery::new("users");
//! query
//!     .select(vec![SelectItem::column("id"), SelectItem::literal("user", "type")])
//!     .filter(col("age").gte(18))
//!     .where_in("status", ["active", "trial"]);
//!
//! let stmt = query.to_statement(Dialect::Sqlite).unwrap();
//! assert_eq!(
//!     stmt.sql,
//!     r#"SELECT "id", 'user' AS "type" FROM "users" WHERE "age" >= ? AND "status" IN (?, ?)"#
//! );
//! assert_eq!(stmt.binds.len(), 3);
//! ```

mod error;
mod expr;
mod ident;
mod render;
mod select;
mod union;

pub use error::{QueryError, QueryResult};
pub use expr::{col, BinaryOp, Expr};
pub use ident::{is_valid_identifier, Ident};
pub use render::{Dialect, Statement};
pub use select::{SelectItem, SelectQuery};
pub use union::{Direction, OrderBy, UnionQuery};
