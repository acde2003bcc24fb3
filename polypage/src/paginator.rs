//! The union pagination engine.

use crate::{
    BulkEntityLoader, ColumnProjector, EntityKind, EntityType, EntityTypeRegistry, PageItem,
    PageWindow, Paginated, PaginationError, PaginationExecutor, PaginationResult,
    PaginatorConfig, RawRow, ScopeRegistry, TransformerRegistry, UnionQueryBuilder,
};
use polypage_db::QueryRunner;
use polypage_query::{Direction, OrderBy, SelectItem, SelectQuery, Statement, UnionQuery};
use polypage_types::Entity;
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves the current page number for a page parameter name.
pub type PageResolver = Box<dyn Fn(&str) -> Option<u64> + Send + Sync>;

/// Whether the union has been built since the last structural change.
#[derive(Debug, Clone, Default)]
pub enum BuildState {
    #[default]
    Unbuilt,
    Built(UnionQuery),
}

impl BuildState {
    pub fn union(&self) -> Option<&UnionQuery> {
        match self {
            Self::Built(union) => Some(union),
            Self::Unbuilt => None,
        }
    }
}

/// Paginates several entity types as one ordered collection.
///
/// Register types, then optionally scopes, column overrides and
/// transformers. The union is built on first use and cached until the next
/// structural change. Each [`paginate`](Self::paginate) call runs one count,
/// one windowed fetch and, unless resolution is skipped, one bulk load per
/// kind present on the page.
pub struct UnionPaginator<K: EntityKind, E> {
    runner: Arc<dyn QueryRunner>,
    config: PaginatorConfig,
    registry: EntityTypeRegistry<K, E>,
    projector: ColumnProjector<K>,
    scopes: ScopeRegistry<K>,
    transformers: TransformerRegistry<K, E>,
    order: Vec<OrderBy>,
    limit: Option<u64>,
    skip_resolution: bool,
    page_resolver: Option<PageResolver>,
    state: BuildState,
}

impl<K: EntityKind, E: Entity + Clone> UnionPaginator<K, E> {
    /// Creates an engine with the default configuration.
    pub fn new<R>(runner: R) -> Self
    where
        R: QueryRunner + 'static,
    {
        Self::with_config(Arc::new(runner), PaginatorConfig::default())
    }

    pub fn with_config(runner: Arc<dyn QueryRunner>, config: PaginatorConfig) -> Self {
        Self {
            runner,
            config,
            registry: EntityTypeRegistry::new(),
            projector: ColumnProjector::new(),
            scopes: ScopeRegistry::new(),
            transformers: TransformerRegistry::new(),
            order: Vec::new(),
            limit: None,
            skip_resolution: false,
            page_resolver: None,
            state: BuildState::Unbuilt,
        }
    }

    pub fn config(&self) -> &PaginatorConfig {
        &self.config
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Adds an entity type as the next union branch.
    pub fn register(&mut self, entity_type: EntityType<K, E>) -> PaginationResult<&mut Self> {
        self.registry.register(entity_type)?;
        self.invalidate("entity type registered");
        Ok(self)
    }

    /// Registers several types in order, stopping at the first invalid one.
    pub fn register_all(
        &mut self,
        entity_types: impl IntoIterator<Item = EntityType<K, E>>,
    ) -> PaginationResult<&mut Self> {
        for entity_type in entity_types {
            self.register(entity_type)?;
        }
        Ok(self)
    }

    /// Replaces the default projection of `kind`.
    ///
    /// Every branch must project the same number of columns, and the id and
    /// discriminator aliases must be present for rows to be resolved.
    pub fn set_selected_columns<I, S>(&mut self, kind: K, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SelectItem>,
    {
        self.projector
            .set_override(kind, columns.into_iter().map(Into::into).collect());
        self.invalidate("column override set");
        self
    }

    /// Adds a filter to the branch of `kind`. Filters for a kind are ANDed
    /// in the order they were added.
    pub fn apply_scope<F>(&mut self, kind: K, scope: F) -> &mut Self
    where
        F: Fn(&mut SelectQuery) + Send + Sync + 'static,
    {
        self.scopes.add(kind, Box::new(scope));
        self.invalidate("scope added");
        self
    }

    /// Sets the transformer for `kind`, replacing any earlier one.
    ///
    /// Returns `false` and changes nothing when `kind` is not registered.
    pub fn transform_results_for<F>(&mut self, kind: K, transformer: F) -> bool
    where
        F: Fn(PageItem<K, E>) -> PageItem<K, E> + Send + Sync + 'static,
    {
        if !self.registry.contains(kind) {
            debug!(?kind, "ignoring transformer for unregistered kind");
            return false;
        }
        self.transformers.set(kind, Box::new(transformer));
        true
    }

    /// Returns union rows instead of loading entities.
    pub fn skip_resolution(&mut self, skip: bool) -> &mut Self {
        self.skip_resolution = skip;
        self
    }

    pub fn is_resolution_skipped(&self) -> bool {
        self.skip_resolution
    }

    /// Installs the lookup used when `paginate` is called without a page.
    pub fn current_page_resolver<F>(&mut self, resolver: F) -> &mut Self
    where
        F: Fn(&str) -> Option<u64> + Send + Sync + 'static,
    {
        self.page_resolver = Some(Box::new(resolver));
        self
    }

    // ========================================================================
    // Ordering and limiting
    // ========================================================================

    /// Appends an ordering term over a union output column.
    ///
    /// The column is checked when a page is requested; an unknown name fails
    /// with [`QueryError::UnknownColumn`](polypage_query::QueryError::UnknownColumn).
    pub fn order_by(&mut self, column: impl Into<String>, direction: Direction) -> &mut Self {
        self.order.push(OrderBy {
            column: column.into(),
            direction,
        });
        self
    }

    /// Newest first on the configured default order column.
    pub fn latest(&mut self) -> &mut Self {
        let column = self.config.order_column().to_string();
        self.order_by(column, Direction::Desc)
    }

    /// Oldest first on the configured default order column.
    pub fn oldest(&mut self) -> &mut Self {
        let column = self.config.order_column().to_string();
        self.order_by(column, Direction::Asc)
    }

    /// Drops explicit ordering, falling back to newest first.
    pub fn reorder(&mut self) -> &mut Self {
        self.order.clear();
        self
    }

    /// Caps the ordered union to its first `n` rows.
    pub fn take(&mut self, n: u64) -> &mut Self {
        self.limit = Some(n);
        self
    }

    /// The ordering the next page query will use.
    pub fn ordering(&self) -> Vec<OrderBy> {
        if self.order.is_empty() {
            vec![OrderBy::desc(self.config.order_column())]
        } else {
            self.order.clone()
        }
    }

    // ========================================================================
    // Pagination
    // ========================================================================

    /// Returns page `page` of `per_page` items.
    ///
    /// Without an explicit page the current page resolver is asked, and
    /// page 1 is used when it has no answer.
    pub fn paginate(
        &mut self,
        per_page: u64,
        page_name: &str,
        page: Option<u64>,
    ) -> PaginationResult<Paginated<K, E>> {
        let page = page
            .or_else(|| self.resolve_current_page(page_name))
            .unwrap_or(1);
        let window = PageWindow::new(per_page, page, page_name)?;

        self.ensure_built()?;
        let union = self
            .state
            .union()
            .ok_or(PaginationError::NoEntityTypesRegistered)?;

        let executor = PaginationExecutor::new(self.runner.as_ref(), &self.config);
        let page_rows = executor.execute::<K>(union, &window, &self.ordering(), self.limit)?;
        debug!(
            total = page_rows.total,
            per_page = window.per_page(),
            page = window.page(),
            rows = page_rows.rows.len(),
            "paginated union"
        );

        let items: Vec<PageItem<K, E>> = if self.skip_resolution {
            page_rows
                .rows
                .into_iter()
                .map(|row| self.finish(row.kind, PageItem::Row(row)))
                .collect()
        } else {
            let lookup = BulkEntityLoader::new(&self.registry).resolve(&page_rows.rows)?;
            page_rows
                .rows
                .into_iter()
                .map(|row| {
                    let kind = row.kind;
                    let item = match lookup.get(&row) {
                        Some(entity) => PageItem::Entity(entity.clone()),
                        None => unresolved(row),
                    };
                    self.finish(kind, item)
                })
                .collect()
        };

        Ok(Paginated::new(
            items,
            page_rows.total,
            window.per_page(),
            window.page(),
            window.page_name(),
            self.config.path.clone(),
        ))
    }

    /// [`paginate`](Self::paginate) with the configured page size and page
    /// name, on the current page.
    pub fn paginate_default(&mut self) -> PaginationResult<Paginated<K, E>> {
        let per_page = self.config.per_page;
        let page_name = self.config.page_name.clone();
        self.paginate(per_page, &page_name, None)
    }

    fn resolve_current_page(&self, page_name: &str) -> Option<u64> {
        self.page_resolver.as_ref().and_then(|resolve| resolve(page_name))
    }

    fn finish(&self, kind: Option<K>, item: PageItem<K, E>) -> PageItem<K, E> {
        match kind {
            Some(kind) => self.transformers.apply(kind, item),
            None => item,
        }
    }

    // ========================================================================
    // Union state
    // ========================================================================

    /// Builds the union if a structural change invalidated it.
    pub fn union_query(&mut self) -> PaginationResult<&UnionQuery> {
        self.ensure_built()?;
        self.state
            .union()
            .ok_or(PaginationError::NoEntityTypesRegistered)
    }

    /// The union rendered for the runner's dialect.
    pub fn union_statement(&mut self) -> PaginationResult<Statement> {
        let dialect = self.runner.dialect();
        Ok(self.union_query()?.to_statement(dialect)?)
    }

    pub fn is_built(&self) -> bool {
        matches!(self.state, BuildState::Built(_))
    }

    pub fn registered_kinds(&self) -> Vec<K> {
        self.registry.kinds()
    }

    pub fn has_scopes(&self, kind: K) -> bool {
        self.scopes.has(kind)
    }

    pub fn has_transformer(&self, kind: K) -> bool {
        self.transformers.has(kind)
    }

    fn ensure_built(&mut self) -> PaginationResult<()> {
        if self.is_built() {
            return Ok(());
        }
        let union =
            UnionQueryBuilder::new(&self.registry, &self.projector, &self.scopes, &self.config)
                .build()?;
        self.state = BuildState::Built(union);
        Ok(())
    }

    fn invalidate(&mut self, reason: &str) {
        if self.is_built() {
            debug!(reason, "union query invalidated");
        }
        self.state = BuildState::Unbuilt;
    }
}

fn unresolved<K: EntityKind, E>(row: RawRow<K>) -> PageItem<K, E> {
    match row.kind {
        Some(kind) => warn!(kind = kind.tag(), id = %row.id, "page row could not be resolved"),
        None => warn!(id = %row.id, "page row has no known discriminator"),
    }
    PageItem::Missing(row)
}
