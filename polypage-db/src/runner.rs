use crate::{DbError, DbResult};
use polypage_query::{Dialect, Statement};
use polypage_types::Row;
use std::sync::Arc;

/// Executes rendered statements.
///
/// Implementations must not reorder rows: the pagination engine relies on
/// the ORDER BY in the statement being the only source of ordering.
pub trait QueryRunner: Send + Sync {
    /// Placeholder style statements must be rendered in.
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    /// Runs a statement and returns every row.
    fn fetch(&self, statement: &Statement) -> DbResult<Vec<Row>>;

    /// Runs a `COUNT(*)` statement and returns the count from the first column.
    fn count(&self, statement: &Statement) -> DbResult<u64> {
        let rows = self.fetch(statement)?;
        let count = rows
            .first()
            .and_then(|row| row.values().first())
            .and_then(|v| v.as_i64())
            .ok_or_else(|| DbError::UnexpectedResult("count query returned no integer".into()))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}

impl<R: QueryRunner + ?Sized> QueryRunner for Arc<R> {
    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }

    fn fetch(&self, statement: &Statement) -> DbResult<Vec<Row>> {
        (**self).fetch(statement)
    }

    fn count(&self, statement: &Statement) -> DbResult<u64> {
        (**self).count(statement)
    }
}
