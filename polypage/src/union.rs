use crate::{
    ColumnProjector, EntityKind, EntityTypeRegistry, PaginationError, PaginationResult,
    PaginatorConfig, ScopeRegistry,
};
use polypage_query::{SelectItem, SelectQuery, UnionQuery};
use tracing::{debug, warn};

/// Builds the union of one projected, scoped branch per registered type.
pub struct UnionQueryBuilder<'a, K, E> {
    registry: &'a EntityTypeRegistry<K, E>,
    projector: &'a ColumnProjector<K>,
    scopes: &'a ScopeRegistry<K>,
    config: &'a PaginatorConfig,
}

impl<'a, K: EntityKind, E> UnionQueryBuilder<'a, K, E> {
    pub fn new(
        registry: &'a EntityTypeRegistry<K, E>,
        projector: &'a ColumnProjector<K>,
        scopes: &'a ScopeRegistry<K>,
        config: &'a PaginatorConfig,
    ) -> Self {
        Self {
            registry,
            projector,
            scopes,
            config,
        }
    }

    /// One branch per registered type, in registration order.
    pub fn branches(&self) -> Vec<SelectQuery> {
        self.registry
            .list()
            .iter()
            .map(|entity_type| {
                let mut query = entity_type.base_query();
                query.select(self.projector.resolve(entity_type, self.config));
                self.scopes.apply(entity_type.kind(), &mut query);
                query
            })
            .collect()
    }

    pub fn build(&self) -> PaginationResult<UnionQuery> {
        let mut branches = self.branches().into_iter();
        let first = branches
            .next()
            .ok_or(PaginationError::NoEntityTypesRegistered)?;

        let mut union = UnionQuery::new(first);
        for branch in branches {
            union.union(branch);
        }

        check_arity(&union);
        debug!(branches = union.len(), "built union query");
        Ok(union)
    }
}

// Misaligned branches are left for the database to reject.
fn check_arity(union: &UnionQuery) {
    let widths: Vec<Option<usize>> = union
        .branches()
        .iter()
        .map(|b| {
            let items = b.select_items();
            let known = !items.is_empty() && !items.contains(&SelectItem::All);
            known.then_some(items.len())
        })
        .collect();

    let mut known = widths.iter().flatten();
    if let Some(first) = known.next() {
        if known.any(|w| w != first) {
            warn!(?widths, "union branches project different column counts");
        }
    }
}
