use crate::{EntityKind, EntityType, PaginatorConfig};
use polypage_query::SelectItem;
use std::collections::HashMap;

/// Chooses the select list of each union branch.
///
/// Without an override a branch projects
/// `pk AS id, created_at, updated_at, '<tag>' AS type`, using the aliases from
/// [`PaginatorConfig`]. A missing timestamp projects as `NULL` so every
/// default branch has the same arity.
///
/// Overrides replace the default list wholesale. They are not checked for a
/// discriminator; rows from a branch without one cannot be resolved.
pub struct ColumnProjector<K> {
    overrides: HashMap<K, Vec<SelectItem>>,
}

impl<K> Default for ColumnProjector<K> {
    fn default() -> Self {
        Self {
            overrides: HashMap::new(),
        }
    }
}

impl<K: EntityKind> ColumnProjector<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an explicit projection for `kind`, replacing any earlier one.
    pub fn set_override(&mut self, kind: K, columns: Vec<SelectItem>) {
        self.overrides.insert(kind, columns);
    }

    pub fn has_override(&self, kind: K) -> bool {
        self.overrides.contains_key(&kind)
    }

    /// The select list for `entity_type`.
    pub fn resolve<E>(
        &self,
        entity_type: &EntityType<K, E>,
        config: &PaginatorConfig,
    ) -> Vec<SelectItem> {
        if let Some(columns) = self.overrides.get(&entity_type.kind()) {
            return columns.clone();
        }

        vec![
            SelectItem::column(entity_type.primary_key_column()).aliased(&config.id_column),
            timestamp(entity_type.created_at_column(), &config.created_at_column),
            timestamp(entity_type.updated_at_column(), &config.updated_at_column),
            SelectItem::literal(entity_type.tag(), &config.discriminator_column),
        ]
    }
}

fn timestamp(column: Option<&str>, alias: &str) -> SelectItem {
    match column {
        Some(column) => SelectItem::column(column).aliased(alias),
        None => SelectItem::null(alias),
    }
}
