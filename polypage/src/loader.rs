//! Post-pagination entity resolution.

use crate::{EntityKind, EntityTypeRegistry, PaginationResult, RawRow};
use polypage_types::{Entity, Value};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Loaded entities of one page, keyed by kind and id.
#[derive(Debug)]
pub struct EntityLookup<K, E> {
    entities: HashMap<K, HashMap<Value, E>>,
}

impl<K: EntityKind, E> EntityLookup<K, E> {
    /// The entity a row refers to, or `None` when it could not be loaded.
    pub fn get(&self, row: &RawRow<K>) -> Option<&E> {
        let kind = row.kind?;
        self.entities.get(&kind)?.get(&row.id)
    }

    /// Number of loaded entities across all kinds.
    pub fn len(&self) -> usize {
        self.entities.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolves a page of rows with one repository call per kind on the page.
pub struct BulkEntityLoader<'a, K, E> {
    registry: &'a EntityTypeRegistry<K, E>,
}

impl<'a, K: EntityKind, E: Entity> BulkEntityLoader<'a, K, E> {
    pub fn new(registry: &'a EntityTypeRegistry<K, E>) -> Self {
        Self { registry }
    }

    pub fn resolve(&self, rows: &[RawRow<K>]) -> PaginationResult<EntityLookup<K, E>> {
        let mut entities = HashMap::new();
        for (kind, ids) in group_ids(rows) {
            let Some(entity_type) = self.registry.get(kind) else {
                warn!(?kind, ids = ids.len(), "rows reference an unregistered kind");
                continue;
            };

            let loaded = entity_type.repository().find_many(&ids)?;
            debug!(kind = kind.tag(), ids = ids.len(), loaded = loaded.len(), "resolved page rows");

            let by_id: HashMap<Value, E> = loaded.into_iter().map(|e| (e.key(), e)).collect();
            entities.insert(kind, by_id);
        }
        Ok(EntityLookup { entities })
    }
}

/// Distinct ids per kind. Kinds and ids keep first-seen order.
fn group_ids<K: EntityKind>(rows: &[RawRow<K>]) -> Vec<(K, Vec<Value>)> {
    let mut groups: Vec<(K, Vec<Value>)> = Vec::new();
    let mut seen: HashSet<(K, &Value)> = HashSet::new();

    for row in rows {
        let Some(kind) = row.kind else {
            continue;
        };
        if !seen.insert((kind, &row.id)) {
            continue;
        }
        match groups.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, ids)) => ids.push(row.id.clone()),
            None => groups.push((kind, vec![row.id.clone()])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use polypage_types::Row;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Kind {
        A,
        B,
    }

    impl EntityKind for Kind {
        fn tag(&self) -> &'static str {
            match self {
                Kind::A => "a",
                Kind::B => "b",
            }
        }

        fn from_tag(tag: &str) -> Option<Self> {
            match tag {
                "a" => Some(Kind::A),
                "b" => Some(Kind::B),
                _ => None,
            }
        }
    }

    fn raw(kind: Option<Kind>, id: i64) -> RawRow<Kind> {
        RawRow {
            kind,
            id: Value::Integer(id),
            row: Row::new(),
        }
    }

    #[test]
    fn groups_by_kind_in_first_seen_order() {
        let rows = vec![
            raw(Some(Kind::B), 1),
            raw(Some(Kind::A), 2),
            raw(Some(Kind::B), 3),
            raw(Some(Kind::A), 1),
        ];
        let groups = group_ids(&rows);
        assert_eq!(
            groups,
            vec![
                (Kind::B, vec![Value::Integer(1), Value::Integer(3)]),
                (Kind::A, vec![Value::Integer(2), Value::Integer(1)]),
            ]
        );
    }

    #[test]
    fn duplicate_ids_are_requested_once() {
        let rows = vec![
            raw(Some(Kind::A), 7),
            raw(Some(Kind::A), 7),
            raw(Some(Kind::A), 8),
        ];
        let groups = group_ids(&rows);
        assert_eq!(groups, vec![(Kind::A, vec![Value::Integer(7), Value::Integer(8)])]);
    }

    #[test]
    fn rows_without_kind_are_not_grouped() {
        let rows = vec![raw(None, 1), raw(Some(Kind::A), 1)];
        assert_eq!(group_ids(&rows), vec![(Kind::A, vec![Value::Integer(1)])]);
    }
}
