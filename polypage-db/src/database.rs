//! Shared SQLite connection.

use crate::{DbError, DbResult, QueryRunner};
use polypage_query::Statement;
use polypage_types::{Row, Value};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::trace;

/// A SQLite database behind a shared, mutex-guarded connection.
///
/// Cloning is cheap; clones share the same connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens (or creates) a database file.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        Ok(Self::from_connection(conn))
    }

    /// Opens an in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self::from_connection(conn))
    }

    /// Wraps an already configured connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::LockPoisoned)
    }

    /// Runs one or more semicolon-separated statements without binds.
    pub fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.lock()?.execute_batch(sql)?;
        Ok(())
    }

    /// Runs a statement that returns no rows and reports the affected row count.
    pub fn execute(&self, statement: &Statement) -> DbResult<usize> {
        let conn = self.lock()?;
        let changed = conn.execute(
            &statement.sql,
            params_from_iter(statement.binds.iter().map(to_sql)),
        )?;
        Ok(changed)
    }

    /// Runs a query and decodes every row.
    pub fn query(&self, statement: &Statement) -> DbResult<Vec<Row>> {
        trace!(sql = %statement.sql, binds = statement.binds.len(), "query");
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&statement.sql)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query(params_from_iter(statement.binds.iter().map(to_sql)))?;
        let mut result = Vec::new();
        while let Some(raw) = rows.next()? {
            let mut row = Row::new();
            for (i, name) in names.iter().enumerate() {
                row.push(name.clone(), from_sql(raw.get_ref(i)?));
            }
            result.push(row);
        }
        Ok(result)
    }

    /// Gives direct access to the connection, e.g. for fixtures or migrations.
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> DbResult<T> {
        let conn = self.lock()?;
        Ok(f(&conn)?)
    }
}

impl QueryRunner for Database {
    fn fetch(&self, statement: &Statement) -> DbResult<Vec<Row>> {
        self.query(statement)
    }
}

fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Integer(*i),
        Value::Real(f) => SqlValue::Real(*f),
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Blob(b) => SqlValue::Blob(b.clone()),
    }
}

fn from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Real(f),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
    }
}
