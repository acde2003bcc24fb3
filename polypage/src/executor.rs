//! Counting and windowed fetching over a built union.

use crate::{EntityKind, PaginationError, PaginationResult, PaginatorConfig};
use polypage_db::QueryRunner;
use polypage_query::{OrderBy, UnionQuery};
use polypage_types::{Row, Value};
use serde::{Serialize, Serializer};
use tracing::{debug, trace};

/// A requested page: 1-indexed page number, page size and parameter name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    per_page: u64,
    page: u64,
    page_name: String,
}

impl PageWindow {
    /// Fails with [`PaginationError::InvalidPageSize`] when `per_page` is zero.
    /// Page numbers below 1 are treated as 1.
    pub fn new(per_page: u64, page: u64, page_name: impl Into<String>) -> PaginationResult<Self> {
        if per_page == 0 {
            return Err(PaginationError::InvalidPageSize(per_page));
        }
        Ok(Self {
            per_page,
            page: page.max(1),
            page_name: page_name.into(),
        })
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_name(&self) -> &str {
        &self.page_name
    }

    /// `(page - 1) * per_page`, saturating.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// One row of a paged union result.
///
/// `kind` is `None` when the discriminator column is absent or holds a tag
/// no kind answers to.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow<K> {
    pub kind: Option<K>,
    pub id: Value,
    pub row: Row,
}

impl<K: EntityKind> RawRow<K> {
    /// Reads the id and discriminator columns named in `config`.
    pub fn from_row(row: Row, config: &PaginatorConfig) -> Self {
        let kind = row
            .get(&config.discriminator_column)
            .and_then(Value::as_str)
            .and_then(K::from_tag);
        let id = row.get(&config.id_column).cloned().unwrap_or_default();
        Self { kind, id, row }
    }
}

impl<K> Serialize for RawRow<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.row.serialize(serializer)
    }
}

/// The rows of one page plus the size of the whole (capped) union.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRows<K> {
    pub rows: Vec<RawRow<K>>,
    pub total: u64,
}

/// Runs the count and the windowed fetch for a page.
pub struct PaginationExecutor<'a> {
    runner: &'a dyn QueryRunner,
    config: &'a PaginatorConfig,
}

impl<'a> PaginationExecutor<'a> {
    pub fn new(runner: &'a dyn QueryRunner, config: &'a PaginatorConfig) -> Self {
        Self { runner, config }
    }

    /// Counts the union once, then fetches the rows of `window` under `order`.
    ///
    /// With a `cap`, only the first `cap` rows of the ordered union exist as
    /// far as paging is concerned. A window past the end returns no rows
    /// without querying, and `total` still reports the full count.
    pub fn execute<K: EntityKind>(
        &self,
        union: &UnionQuery,
        window: &PageWindow,
        order: &[OrderBy],
        cap: Option<u64>,
    ) -> PaginationResult<PageRows<K>> {
        let dialect = self.runner.dialect();
        union.check_order(order)?;

        let count = union.count_statement(dialect)?;
        trace!(sql = %count.sql, binds = count.binds.len(), "count statement");
        let counted = self.runner.count(&count)?;
        let total = cap.map_or(counted, |cap| counted.min(cap));

        let offset = window.offset();
        if offset >= total {
            debug!(total, page = window.page(), "page is past the end of the union");
            return Ok(PageRows {
                rows: Vec::new(),
                total,
            });
        }

        let limit = window.per_page().min(total - offset);
        let page = union.page_statement(dialect, order, limit, offset)?;
        trace!(sql = %page.sql, binds = page.binds.len(), "page statement");

        let rows = self
            .runner
            .fetch(&page)?
            .into_iter()
            .map(|row| RawRow::from_row(row, self.config))
            .collect();
        Ok(PageRows { rows, total })
    }
}
