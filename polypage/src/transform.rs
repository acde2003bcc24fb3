use crate::{EntityKind, RawRow};
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// One item of a page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageItem<K, E> {
    /// The fully loaded entity the row refers to.
    Entity(E),
    /// The row's entity could not be loaded, e.g. it was deleted between the
    /// page query and the bulk load.
    Missing(RawRow<K>),
    /// The projected union row, when resolution is skipped.
    Row(RawRow<K>),
    /// Output of a transformer.
    Transformed(serde_json::Value),
}

impl<K, E> PageItem<K, E> {
    pub fn as_entity(&self) -> Option<&E> {
        match self {
            Self::Entity(e) => Some(e),
            _ => None,
        }
    }

    pub fn into_entity(self) -> Option<E> {
        match self {
            Self::Entity(e) => Some(e),
            _ => None,
        }
    }

    /// The union row behind a `Row` or `Missing` item.
    pub fn as_row(&self) -> Option<&RawRow<K>> {
        match self {
            Self::Row(row) | Self::Missing(row) => Some(row),
            _ => None,
        }
    }

    pub fn as_transformed(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Transformed(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing(_))
    }
}

impl<K, E: Serialize> Serialize for PageItem<K, E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Entity(e) => e.serialize(serializer),
            Self::Missing(_) => serializer.serialize_none(),
            Self::Row(row) => row.serialize(serializer),
            Self::Transformed(v) => v.serialize(serializer),
        }
    }
}

/// Maps a page item of one kind to its final form.
///
/// Receives `Entity` or `Missing` when entities are resolved, and `Row` when
/// resolution is skipped.
pub type Transformer<K, E> = Box<dyn Fn(PageItem<K, E>) -> PageItem<K, E> + Send + Sync>;

/// At most one transformer per kind.
pub struct TransformerRegistry<K, E> {
    transformers: HashMap<K, Transformer<K, E>>,
}

impl<K, E> Default for TransformerRegistry<K, E> {
    fn default() -> Self {
        Self {
            transformers: HashMap::new(),
        }
    }
}

impl<K: EntityKind, E> TransformerRegistry<K, E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `transformer` for `kind`, replacing any previous one.
    pub fn set(&mut self, kind: K, transformer: Transformer<K, E>) {
        self.transformers.insert(kind, transformer);
    }

    pub fn has(&self, kind: K) -> bool {
        self.transformers.contains_key(&kind)
    }

    /// Runs the transformer for `kind`, or returns `item` untouched.
    pub fn apply(&self, kind: K, item: PageItem<K, E>) -> PageItem<K, E> {
        match self.transformers.get(&kind) {
            Some(transform) => transform(item),
            None => item,
        }
    }

    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }
}
