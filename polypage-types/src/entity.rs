use crate::{Error, Result, Row, Value};
use serde::{Deserialize, Serialize};

/// A fully-loaded record that can be keyed by its primary-key value.
///
/// Bulk loaders use [`Entity::key`] to match loaded entities back to the
/// rows that referenced them, so it must return the same value the
/// primary-key column holds in storage.
pub trait Entity {
    fn key(&self) -> Value;
}

/// A generic entity backed by a JSON field map.
///
/// Useful when a source has no dedicated Rust struct: every column of the
/// stored row ends up in `fields`, and the primary key is kept in `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub kind: String,
    pub id: Value,
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    /// Builds a record from a full table row, taking the key from `primary_key`.
    ///
    /// A qualified key such as `users.id` is looked up as `id`, the name the
    /// database gives that result column.
    pub fn from_row(kind: impl Into<String>, row: &Row, primary_key: &str) -> Result<Self> {
        let column = primary_key.rsplit('.').next().unwrap_or(primary_key);
        let id = row
            .get(column)
            .cloned()
            .ok_or_else(|| Error::Decode(format!("missing primary key column: {primary_key}")))?;
        Ok(Self {
            kind: kind.into(),
            id,
            fields: row.to_json(),
        })
    }

    /// Returns a field as JSON.
    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.fields.get(field)
    }

    /// Extracts a string field.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(|v| v.as_str())
    }

    /// Extracts an integer field.
    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(|v| v.as_i64())
    }

    /// Extracts a boolean field. SQLite stores booleans as 0/1.
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.get(field)
            .and_then(|v| v.as_bool().or_else(|| v.as_i64().map(|i| i != 0)))
    }
}

impl Entity for Record {
    fn key(&self) -> Value {
        self.id.clone()
    }
}
