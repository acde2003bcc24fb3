//! Bulk entity loading by primary key.

use crate::{Database, DbResult};
use polypage_query::{Dialect, SelectQuery};
use polypage_types::{Record, Row, Value};
use std::sync::Arc;
use tracing::debug;

/// Largest id list bound into a single `IN (...)` clause.
///
/// Stays well under SQLite's historical limit of 999 bound variables.
pub const MAX_IDS_PER_QUERY: usize = 500;

/// Loads fully populated entities by primary key.
///
/// One call to [`find_many`](Repository::find_many) is one logical bulk load,
/// however the implementation chooses to split it internally. Ids that no
/// longer exist are simply absent from the result.
pub trait Repository<E>: Send + Sync {
    fn find_many(&self, ids: &[Value]) -> DbResult<Vec<E>>;
}

impl<E, R: Repository<E> + ?Sized> Repository<E> for Arc<R> {
    fn find_many(&self, ids: &[Value]) -> DbResult<Vec<E>> {
        (**self).find_many(ids)
    }
}

type RowMapper<E> = Arc<dyn Fn(&Row) -> DbResult<E> + Send + Sync>;

/// A [`Repository`] over one SQLite table.
pub struct SqliteRepository<E> {
    db: Database,
    table: String,
    primary_key: String,
    soft_delete: Option<String>,
    mapper: RowMapper<E>,
}

impl<E> Clone for SqliteRepository<E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            table: self.table.clone(),
            primary_key: self.primary_key.clone(),
            soft_delete: self.soft_delete.clone(),
            mapper: Arc::clone(&self.mapper),
        }
    }
}

impl<E> SqliteRepository<E> {
    /// Creates a repository that decodes each full table row with `mapper`.
    pub fn new<F>(
        db: Database,
        table: impl Into<String>,
        primary_key: impl Into<String>,
        mapper: F,
    ) -> Self
    where
        F: Fn(&Row) -> DbResult<E> + Send + Sync + 'static,
    {
        Self {
            db,
            table: table.into(),
            primary_key: primary_key.into(),
            soft_delete: None,
            mapper: Arc::new(mapper),
        }
    }

    /// Skips rows whose `column` is not NULL.
    #[must_use]
    pub fn with_soft_delete(mut self, column: impl Into<String>) -> Self {
        self.soft_delete = Some(column.into());
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }
}

impl SqliteRepository<Record> {
    /// A repository yielding generic [`Record`]s tagged with `kind`.
    pub fn records(
        db: Database,
        kind: impl Into<String>,
        table: impl Into<String>,
        primary_key: impl Into<String>,
    ) -> Self {
        let kind = kind.into();
        let primary_key = primary_key.into();
        let pk = primary_key.clone();
        Self::new(db, table, primary_key, move |row| {
            Ok(Record::from_row(kind.clone(), row, &pk)?)
        })
    }
}

impl<E> Repository<E> for SqliteRepository<E> {
    fn find_many(&self, ids: &[Value]) -> DbResult<Vec<E>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut entities = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(MAX_IDS_PER_QUERY) {
            let mut query = SelectQuery::new(self.table.as_str());
            query.where_in(&self.primary_key, chunk.iter().cloned());
            if let Some(column) = &self.soft_delete {
                query.where_null(column);
            }
            let rows = self.db.query(&query.to_statement(Dialect::Sqlite)?)?;
            for row in &rows {
                entities.push((self.mapper)(row)?);
            }
        }

        debug!(
            table = %self.table,
            requested = ids.len(),
            loaded = entities.len(),
            "bulk load"
        );
        Ok(entities)
    }
}
