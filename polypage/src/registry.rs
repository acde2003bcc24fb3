use crate::{EntityKind, EntityType, PaginationResult};

/// The ordered list of participating entity types.
///
/// Registration order is union branch order. Registering the same kind
/// twice is allowed and yields two branches.
pub struct EntityTypeRegistry<K, E> {
    types: Vec<EntityType<K, E>>,
}

impl<K, E> Default for EntityTypeRegistry<K, E> {
    fn default() -> Self {
        Self { types: Vec::new() }
    }
}

impl<K: EntityKind, E> EntityTypeRegistry<K, E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `entity_type` after validating it.
    pub fn register(&mut self, entity_type: EntityType<K, E>) -> PaginationResult<()> {
        entity_type.validate()?;
        self.types.push(entity_type);
        Ok(())
    }

    /// Registered types in registration order.
    pub fn list(&self) -> &[EntityType<K, E>] {
        &self.types
    }

    /// The first registered type of `kind`.
    pub fn get(&self, kind: K) -> Option<&EntityType<K, E>> {
        self.types.iter().find(|t| t.kind() == kind)
    }

    pub fn contains(&self, kind: K) -> bool {
        self.get(kind).is_some()
    }

    /// Distinct registered kinds, in first-registration order.
    pub fn kinds(&self) -> Vec<K> {
        let mut kinds = Vec::with_capacity(self.types.len());
        for t in &self.types {
            if !kinds.contains(&t.kind()) {
                kinds.push(t.kind());
            }
        }
        kinds
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
