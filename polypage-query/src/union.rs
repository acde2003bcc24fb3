//! UNION of several single-table queries, and the outer queries that count
//! and page it.

use crate::render::SqlWriter;
use crate::{Dialect, QueryError, QueryResult, SelectItem, SelectQuery, Statement};
use polypage_types::Value;

const COUNT_ALIAS: &str = "union_count";
const PAGE_ALIAS: &str = "union_page";

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// An ORDER BY term over an output column of the union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Desc,
        }
    }
}

/// `branch UNION branch UNION ...`, in insertion order.
///
/// Branches must project the same number of columns with the same meaning;
/// the output column names are taken from the first branch.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionQuery {
    branches: Vec<SelectQuery>,
}

impl UnionQuery {
    pub fn new(first: SelectQuery) -> Self {
        Self {
            branches: vec![first],
        }
    }

    /// Builds a union from a non-empty list of branches.
    pub fn from_branches(branches: Vec<SelectQuery>) -> QueryResult<Self> {
        if branches.is_empty() {
            return Err(QueryError::EmptyUnion);
        }
        Ok(Self { branches })
    }

    /// Appends a branch.
    pub fn union(&mut self, query: SelectQuery) -> &mut Self {
        self.branches.push(query);
        self
    }

    #[must_use]
    pub fn branches(&self) -> &[SelectQuery] {
        &self.branches
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.branches.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Output column names of the union, taken from the first branch.
    ///
    /// `None` when the first branch selects `*`, since the names are then
    /// only known to the database.
    #[must_use]
    pub fn output_columns(&self) -> Option<Vec<&str>> {
        let items = self.branches.first()?.select_items();
        if items.is_empty() {
            return None;
        }
        items.iter().map(SelectItem::output_name).collect()
    }

    /// Fails on an ORDER BY term naming a column the union does not output.
    ///
    /// SQLite reads an unknown double-quoted name as a string literal, which
    /// sorts on a constant instead of failing.
    pub fn check_order(&self, order: &[OrderBy]) -> QueryResult<()> {
        let Some(columns) = self.output_columns() else {
            return Ok(());
        };
        match order.iter().find(|term| !columns.contains(&term.column.as_str())) {
            Some(term) => Err(QueryError::UnknownColumn(term.column.clone())),
            None => Ok(()),
        }
    }

    /// Number of values bound by all branches together.
    #[must_use]
    pub fn bind_count(&self) -> usize {
        self.branches.iter().map(SelectQuery::bind_count).sum()
    }

    fn render(&self, w: &mut SqlWriter) -> QueryResult<()> {
        for (i, branch) in self.branches.iter().enumerate() {
            if i > 0 {
                w.push_str(" UNION ");
            }
            branch.render(w)?;
        }
        Ok(())
    }

    /// Renders the bare union.
    pub fn to_statement(&self, dialect: Dialect) -> QueryResult<Statement> {
        let mut w = SqlWriter::new(dialect);
        self.render(&mut w)?;
        Ok(w.finish())
    }

    /// `SELECT COUNT(*) FROM (<union>)`: one count over the unified set.
    pub fn count_statement(&self, dialect: Dialect) -> QueryResult<Statement> {
        let mut w = SqlWriter::new(dialect);
        w.push_str("SELECT COUNT(*) AS ");
        w.push_ident("aggregate")?;
        w.push_str(" FROM (");
        self.render(&mut w)?;
        w.push_str(") AS ");
        w.push_ident(COUNT_ALIAS)?;
        Ok(w.finish())
    }

    /// `SELECT * FROM (<union>) ORDER BY ... LIMIT ? OFFSET ?`.
    ///
    /// Every ORDER BY column must be an output column of the union (see
    /// [`check_order`](Self::check_order)).
    ///
    /// The branch binds come first and the window binds last, matching the
    /// placeholder order in the SQL text.
    pub fn page_statement(
        &self,
        dialect: Dialect,
        order: &[OrderBy],
        limit: u64,
        offset: u64,
    ) -> QueryResult<Statement> {
        self.check_order(order)?;
        let mut w = SqlWriter::new(dialect);
        w.push_str("SELECT * FROM (");
        self.render(&mut w)?;
        w.push_str(") AS ");
        w.push_ident(PAGE_ALIAS)?;
        for (i, term) in order.iter().enumerate() {
            w.push_str(if i == 0 { " ORDER BY " } else { ", " });
            w.push_ident(&term.column)?;
            w.push_str(" ");
            w.push_str(term.direction.as_sql());
        }
        w.push_str(" LIMIT ");
        w.push_bind(clamp(limit));
        w.push_str(" OFFSET ");
        w.push_bind(clamp(offset));
        Ok(w.finish())
    }
}

// SQLite LIMIT/OFFSET are signed 64-bit.
fn clamp(n: u64) -> Value {
    Value::Integer(i64::try_from(n).unwrap_or(i64::MAX))
}
