//! Single-table SELECT queries.

use crate::render::SqlWriter;
use crate::{col, Dialect, Expr, QueryResult, Statement};
use polypage_types::Value;

/// One entry of a select list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    /// `*`
    All,
    /// A column, optionally aliased.
    Column { name: String, alias: Option<String> },
    /// A constant written inline into the SQL (`'post' AS "type"`).
    Literal { value: Value, alias: String },
    /// An expression whose values are bound (`COALESCE("title", ?) AS "label"`).
    Expr { expr: Expr, alias: String },
}

impl SelectItem {
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column {
            name: name.into(),
            alias: None,
        }
    }

    pub fn literal(value: impl Into<Value>, alias: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            alias: alias.into(),
        }
    }

    /// `NULL AS alias`, for keeping union branches aligned.
    pub fn null(alias: impl Into<String>) -> Self {
        Self::Literal {
            value: Value::Null,
            alias: alias.into(),
        }
    }

    pub fn expr(expr: Expr, alias: impl Into<String>) -> Self {
        Self::Expr {
            expr,
            alias: alias.into(),
        }
    }

    /// Sets (or replaces) the alias. `*` cannot be aliased and is returned unchanged.
    #[must_use]
    pub fn aliased(self, new_alias: impl Into<String>) -> Self {
        let new_alias = new_alias.into();
        match self {
            Self::All => Self::All,
            Self::Column { name, .. } => Self::Column {
                name,
                alias: Some(new_alias),
            },
            Self::Literal { value, .. } => Self::Literal {
                value,
                alias: new_alias,
            },
            Self::Expr { expr, .. } => Self::Expr {
                expr,
                alias: new_alias,
            },
        }
    }

    /// The column name this item produces in the result set, if known.
    #[must_use]
    pub fn output_name(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Column {
                alias: Some(alias), ..
            } => Some(alias),
            Self::Column { name, alias: None } => {
                Some(name.rsplit('.').next().unwrap_or(name))
            }
            Self::Literal { alias, .. } | Self::Expr { alias, .. } => Some(alias),
        }
    }

    fn render(&self, w: &mut SqlWriter) -> QueryResult<()> {
        match self {
            Self::All => w.push_str("*"),
            Self::Column { name, alias } => {
                w.push_ident(name)?;
                // Skip `"id" AS "id"`.
                if let Some(alias) = alias.as_deref().filter(|a| *a != name.as_str()) {
                    w.push_str(" AS ");
                    w.push_ident(alias)?;
                }
            }
            Self::Literal { value, alias } => {
                w.push_literal(value);
                w.push_str(" AS ");
                w.push_ident(alias)?;
            }
            Self::Expr { expr, alias } => {
                expr.render(w)?;
                w.push_str(" AS ");
                w.push_ident(alias)?;
            }
        }
        Ok(())
    }
}

impl From<&str> for SelectItem {
    fn from(name: &str) -> Self {
        if name == "*" {
            Self::All
        } else {
            Self::column(name)
        }
    }
}

impl From<String> for SelectItem {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

/// A `SELECT ... FROM table WHERE ...` over a single table.
///
/// Filters are combined with `AND` in the order they were added. Mutating
/// methods return `&mut Self` so scope closures can chain them.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    table: String,
    columns: Vec<SelectItem>,
    filters: Vec<Expr>,
}

impl SelectQuery {
    /// A `SELECT *` over `table` with no filters.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            filters: Vec::new(),
        }
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub fn select_items(&self) -> &[SelectItem] {
        &self.columns
    }

    #[must_use]
    pub fn filters(&self) -> &[Expr] {
        &self.filters
    }

    /// Replaces the select list.
    pub fn select<I, S>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SelectItem>,
    {
        self.columns = items.into_iter().map(Into::into).collect();
        self
    }

    /// Appends to the select list.
    pub fn add_select(&mut self, item: impl Into<SelectItem>) -> &mut Self {
        self.columns.push(item.into());
        self
    }

    /// Adds a filter, ANDed with the existing ones.
    pub fn filter(&mut self, expr: Expr) -> &mut Self {
        self.filters.push(expr);
        self
    }

    pub fn where_eq(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        self.filter(col(column).eq(value))
    }

    pub fn where_not_eq(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        self.filter(col(column).not_eq(value))
    }

    pub fn where_gt(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        self.filter(col(column).gt(value))
    }

    pub fn where_gte(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        self.filter(col(column).gte(value))
    }

    pub fn where_lt(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        self.filter(col(column).lt(value))
    }

    pub fn where_lte(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        self.filter(col(column).lte(value))
    }

    pub fn where_in<I, V>(&mut self, column: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.filter(col(column).in_list(values))
    }

    pub fn where_not_in<I, V>(&mut self, column: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.filter(col(column).not_in_list(values))
    }

    pub fn where_null(&mut self, column: &str) -> &mut Self {
        self.filter(col(column).is_null())
    }

    pub fn where_not_null(&mut self, column: &str) -> &mut Self {
        self.filter(col(column).is_not_null())
    }

    pub fn where_between(
        &mut self,
        column: &str,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> &mut Self {
        self.filter(col(column).between(low, high))
    }

    pub fn where_like(&mut self, column: &str, pattern: impl Into<Value>) -> &mut Self {
        self.filter(col(column).like(pattern))
    }

    pub fn where_raw(
        &mut self,
        sql: impl Into<String>,
        binds: impl IntoIterator<Item = Value>,
    ) -> &mut Self {
        self.filter(Expr::raw(sql, binds))
    }

    /// Adds a parenthesized OR-group: `(a OR b OR ...)`.
    pub fn where_any(&mut self, alternatives: impl IntoIterator<Item = Expr>) -> &mut Self {
        self.filter(Expr::Or(alternatives.into_iter().collect()))
    }

    /// Number of values this query binds when rendered.
    #[must_use]
    pub fn bind_count(&self) -> usize {
        let select_binds: usize = self
            .columns
            .iter()
            .map(|item| match item {
                SelectItem::Expr { expr, .. } => expr.bind_count(),
                _ => 0,
            })
            .sum();
        select_binds + self.filters.iter().map(Expr::bind_count).sum::<usize>()
    }

    pub(crate) fn render(&self, w: &mut SqlWriter) -> QueryResult<()> {
        w.push_str("SELECT ");
        if self.columns.is_empty() {
            w.push_str("*");
        }
        for (i, item) in self.columns.iter().enumerate() {
            if i > 0 {
                w.push_str(", ");
            }
            item.render(w)?;
        }
        w.push_str(" FROM ");
        w.push_ident(&self.table)?;
        for (i, filter) in self.filters.iter().enumerate() {
            w.push_str(if i == 0 { " WHERE " } else { " AND " });
            filter.render(w)?;
        }
        Ok(())
    }

    /// Renders this query on its own.
    pub fn to_statement(&self, dialect: Dialect) -> QueryResult<Statement> {
        let mut w = SqlWriter::new(dialect);
        self.render(&mut w)?;
        Ok(w.finish())
    }
}
