//! Entity type descriptors.

use crate::{EntityKind, PaginationError, PaginationResult};
use polypage_db::Repository;
use polypage_query::{is_valid_identifier, SelectQuery};
use std::fmt;
use std::sync::Arc;

/// Describes one participating source: its kind, the table it lives in,
/// its key and timestamp columns, an optional soft-delete column, and the
/// repository that bulk-loads its entities.
pub struct EntityType<K, E> {
    kind: K,
    table: String,
    primary_key: String,
    created_at: Option<String>,
    updated_at: Option<String>,
    soft_delete: Option<String>,
    repository: Arc<dyn Repository<E>>,
}

impl<K: EntityKind, E> EntityType<K, E> {
    /// A type keyed by `id`, with `created_at`/`updated_at` timestamps and no
    /// soft deletes.
    pub fn new<R>(kind: K, table: impl Into<String>, repository: R) -> Self
    where
        R: Repository<E> + 'static,
    {
        Self::with_repository(kind, table, Arc::new(repository))
    }

    /// Like [`new`](Self::new), sharing an existing repository.
    pub fn with_repository(
        kind: K,
        table: impl Into<String>,
        repository: Arc<dyn Repository<E>>,
    ) -> Self {
        Self {
            kind,
            table: table.into(),
            primary_key: "id".to_string(),
            created_at: Some("created_at".to_string()),
            updated_at: Some("updated_at".to_string()),
            soft_delete: None,
            repository,
        }
    }

    #[must_use]
    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = column.into();
        self
    }

    /// Renames the creation timestamp, or drops it with `None`.
    #[must_use]
    pub fn created_at(mut self, column: Option<&str>) -> Self {
        self.created_at = column.map(str::to_string);
        self
    }

    /// Renames the update timestamp, or drops it with `None`.
    #[must_use]
    pub fn updated_at(mut self, column: Option<&str>) -> Self {
        self.updated_at = column.map(str::to_string);
        self
    }

    #[must_use]
    pub fn without_timestamps(self) -> Self {
        self.created_at(None).updated_at(None)
    }

    /// Excludes rows whose `column` is not NULL.
    #[must_use]
    pub fn soft_delete(mut self, column: impl Into<String>) -> Self {
        self.soft_delete = Some(column.into());
        self
    }

    pub fn kind(&self) -> K {
        self.kind
    }

    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn primary_key_column(&self) -> &str {
        &self.primary_key
    }

    pub fn created_at_column(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    pub fn updated_at_column(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }

    pub fn soft_delete_column(&self) -> Option<&str> {
        self.soft_delete.as_deref()
    }

    pub fn repository(&self) -> &dyn Repository<E> {
        self.repository.as_ref()
    }

    /// The unprojected, unscoped query over this type's table, with the
    /// soft-delete exclusion already applied.
    pub fn base_query(&self) -> SelectQuery {
        let mut query = SelectQuery::new(self.table.as_str());
        if let Some(column) = &self.soft_delete {
            query.where_null(column);
        }
        query
    }

    /// Checks that the type can produce a query and be looked up by key.
    pub fn validate(&self) -> PaginationResult<()> {
        let tag = self.kind.tag();
        if tag.is_empty() || K::from_tag(tag) != Some(self.kind) {
            return Err(PaginationError::InvalidEntityType(format!(
                "{:?}: tag {tag:?} does not parse back to its kind",
                self.kind
            )));
        }

        let columns = [
            ("table", Some(self.table.as_str())),
            ("primary key", Some(self.primary_key.as_str())),
            ("created_at", self.created_at.as_deref()),
            ("updated_at", self.updated_at.as_deref()),
            ("soft delete", self.soft_delete.as_deref()),
        ];
        for (what, name) in columns {
            if let Some(name) = name.filter(|n| !is_valid_identifier(n)) {
                return Err(PaginationError::InvalidEntityType(format!(
                    "{tag}: invalid {what} name {name:?}"
                )));
            }
        }
        Ok(())
    }
}

impl<K: Clone, E> Clone for EntityType<K, E> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            table: self.table.clone(),
            primary_key: self.primary_key.clone(),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
            soft_delete: self.soft_delete.clone(),
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<K: fmt::Debug, E> fmt::Debug for EntityType<K, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityType")
            .field("kind", &self.kind)
            .field("table", &self.table)
            .field("primary_key", &self.primary_key)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .field("soft_delete", &self.soft_delete)
            .finish_non_exhaustive()
    }
}
