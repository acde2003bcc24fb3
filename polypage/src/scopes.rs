use crate::EntityKind;
use polypage_query::SelectQuery;

/// A filter applied to one branch before the union.
///
/// Scopes should only add predicates. Changing the select list breaks the
/// alignment of union branches.
pub type Scope = Box<dyn Fn(&mut SelectQuery) + Send + Sync>;

/// Per-kind filters, kept in registration order.
pub struct ScopeRegistry<K> {
    scopes: Vec<(K, Scope)>,
}

impl<K> Default for ScopeRegistry<K> {
    fn default() -> Self {
        Self { scopes: Vec::new() }
    }
}

impl<K: EntityKind> ScopeRegistry<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: K, scope: Scope) {
        self.scopes.push((kind, scope));
    }

    pub fn has(&self, kind: K) -> bool {
        self.scopes.iter().any(|(k, _)| *k == kind)
    }

    /// Filters for `kind`, in registration order.
    pub fn scopes_for(&self, kind: K) -> impl Iterator<Item = &Scope> + '_ {
        self.scopes
            .iter()
            .filter(move |(k, _)| *k == kind)
            .map(|(_, scope)| scope)
    }

    /// Applies every filter for `kind` to `query`, in order.
    pub fn apply(&self, kind: K, query: &mut SelectQuery) {
        for scope in self.scopes_for(kind) {
            scope(query);
        }
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}
