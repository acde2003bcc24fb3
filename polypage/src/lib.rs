//! Union pagination over heterogeneous record sources.
//!
//! A [`UnionPaginator`] pages several tables as one ordered collection:
//!
//! 1. each registered [`EntityType`] contributes one `SELECT` branch, with
//!    its own projection ([`ColumnProjector`]), filters ([`ScopeRegistry`])
//!    and soft-delete exclusion
//! 2. the branches are combined with `UNION` ([`UnionQueryBuilder`]), counted
//!    once and fetched one window at a time ([`PaginationExecutor`])
//! 3. the page's rows are resolved with one bulk load per kind
//!    ([`BulkEntityLoader`]) and passed through per-kind transformers
//!    ([`TransformerRegistry`])
//!
//! Rows carry a literal discriminator column naming their [`EntityKind`], so
//! resolution never needs to guess where a row came from.
//!
//! # Example
//!
//! ```
//! use polypage::{EntityKind, EntityType, PageItem, UnionPaginator};
//! use polypage_db::{Database, SqliteRepository};
//! use polypage_types::Record;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Kind {
//!     User,
//!     Post,
//! }
//!
//! impl EntityKind for Kind {
//!     fn tag(&self) -> &'static str {
//!         match self {
//!             Kind::User => "user",
//!             Kind::Post => "post",
//!         }
//!     }
//!
//!     fn from_tag(tag: &str) -> Option<Self> {
//!         match tag {
//!             "user" => Some(Kind::User),
//!             "post" => Some(Kind::Post),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::open_in_memory()?;
//! db.execute_batch(
//!     "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, created_at INTEGER, updated_at INTEGER);
//!      CREATE TABLE posts (id INTEGER PRIMARY KEY, title TEXT, created_at INTEGER, updated_at INTEGER);
//!      INSERT INTO users VALUES (1, 'ada', 10, 10);
//!      INSERT INTO posts VALUES (1, 'hello', 20, 20);",
//! )?;
//!
//! let mut feed: UnionPaginator<Kind, Record> = UnionPaginator::new(db.clone());
//! feed.register(EntityType::new(
//!     Kind::User,
//!     "users",
//!     SqliteRepository::records(db.clone(), "user", "users", "id"),
//! ))?
//! .register(EntityType::new(
//!     Kind::Post,
//!     "posts",
//!     SqliteRepository::records(db.clone(), "post", "posts", "id"),
//! ))?;
//!
//! let page = feed.paginate(15, "page", Some(1))?;
//! assert_eq!(page.total(), 2);
//! // Newest first.
//! let kinds: Vec<&str> = page
//!     .items()
//!     .iter()
//!     .filter_map(PageItem::as_entity)
//!     .map(|r| r.kind.as_str())
//!     .collect();
//! assert_eq!(kinds, ["post", "user"]);
//! # Ok(())
//! # }
//! ```

mod columns;
mod config;
mod entity_type;
mod error;
mod executor;
mod kind;
mod loader;
mod page;
mod paginator;
mod registry;
mod scopes;
mod transform;
mod union;

pub use columns::ColumnProjector;
pub use config::{PaginatorConfig, DEFAULT_PAGE_NAME, DEFAULT_PER_PAGE};
pub use entity_type::EntityType;
pub use error::{PaginationError, PaginationResult};
pub use executor::{PageRows, PageWindow, PaginationExecutor, RawRow};
pub use kind::EntityKind;
pub use loader::{BulkEntityLoader, EntityLookup};
pub use page::Paginated;
pub use paginator::{BuildState, PageResolver, UnionPaginator};
pub use registry::EntityTypeRegistry;
pub use scopes::{Scope, ScopeRegistry};
pub use transform::{PageItem, Transformer, TransformerRegistry};
pub use union::UnionQueryBuilder;

pub use polypage_query::{col, Direction, Expr, OrderBy, SelectItem, SelectQuery};
