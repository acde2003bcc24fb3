//! Predicate expressions.

use crate::render::SqlWriter;
use crate::QueryResult;
use polypage_types::Value;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl BinaryOp {
    const fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
        }
    }
}

/// A SQL expression tree. Every [`Value`] inside it is bound, never inlined.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Column(String),
    Value(Value),
    /// Raw SQL with `?` placeholders, one per bind.
    Raw {
        sql: String,
        binds: Vec<Value>,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Box<Expr>),
    IsNull {
        expr: Box<Expr>,
        negated: bool,
    },
    InList {
        expr: Box<Expr>,
        list: Vec<Value>,
        negated: bool,
    },
    Between {
        expr: Box<Expr>,
        low: Value,
        high: Value,
        negated: bool,
    },
    Like {
        expr: Box<Expr>,
        pattern: Value,
        negated: bool,
    },
}

/// Shorthand for a column reference.
pub fn col(name: impl Into<String>) -> Expr {
    Expr::Column(name.into())
}

impl Expr {
    /// A bound value.
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    /// A raw SQL fragment with positional binds.
    pub fn raw(sql: impl Into<String>, binds: impl IntoIterator<Item = Value>) -> Self {
        Self::Raw {
            sql: sql.into(),
            binds: binds.into_iter().collect(),
        }
    }

    fn binary(self, op: BinaryOp, right: impl Into<Value>) -> Self {
        Self::Binary {
            left: Box::new(self),
            op,
            right: Box::new(Self::Value(right.into())),
        }
    }

    pub fn eq(self, value: impl Into<Value>) -> Self {
        self.binary(BinaryOp::Eq, value)
    }

    pub fn not_eq(self, value: impl Into<Value>) -> Self {
        self.binary(BinaryOp::NotEq, value)
    }

    pub fn lt(self, value: impl Into<Value>) -> Self {
        self.binary(BinaryOp::Lt, value)
    }

    pub fn lte(self, value: impl Into<Value>) -> Self {
        self.binary(BinaryOp::LtEq, value)
    }

    pub fn gt(self, value: impl Into<Value>) -> Self {
        self.binary(BinaryOp::Gt, value)
    }

    pub fn gte(self, value: impl Into<Value>) -> Self {
        self.binary(BinaryOp::GtEq, value)
    }

    pub fn is_null(self) -> Self {
        Self::IsNull {
            expr: Box::new(self),
            negated: false,
        }
    }

    pub fn is_not_null(self) -> Self {
        Self::IsNull {
            expr: Box::new(self),
            negated: true,
        }
    }

    pub fn in_list<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::InList {
            expr: Box::new(self),
            list: values.into_iter().map(Into::into).collect(),
            negated: false,
        }
    }

    pub fn not_in_list<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::InList {
            expr: Box::new(self),
            list: values.into_iter().map(Into::into).collect(),
            negated: true,
        }
    }

    pub fn between(self, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        Self::Between {
            expr: Box::new(self),
            low: low.into(),
            high: high.into(),
            negated: false,
        }
    }

    pub fn like(self, pattern: impl Into<Value>) -> Self {
        Self::Like {
            expr: Box::new(self),
            pattern: pattern.into(),
            negated: false,
        }
    }

    pub fn not_like(self, pattern: impl Into<Value>) -> Self {
        Self::Like {
            expr: Box::new(self),
            pattern: pattern.into(),
            negated: true,
        }
    }

    /// Conjunction, flattening nested `And`s.
    pub fn and(self, other: Self) -> Self {
        match self {
            Self::And(mut parts) => {
                parts.push(other);
                Self::And(parts)
            }
            first => Self::And(vec![first, other]),
        }
    }

    /// Disjunction, flattening nested `Or`s.
    pub fn or(self, other: Self) -> Self {
        match self {
            Self::Or(mut parts) => {
                parts.push(other);
                Self::Or(parts)
            }
            first => Self::Or(vec![first, other]),
        }
    }

    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Number of values this expression binds.
    #[must_use]
    pub fn bind_count(&self) -> usize {
        match self {
            Self::Column(_) => 0,
            Self::Value(_) => 1,
            Self::Raw { binds, .. } => binds.len(),
            Self::Binary { left, right, .. } => left.bind_count() + right.bind_count(),
            Self::And(parts) | Self::Or(parts) => parts.iter().map(Self::bind_count).sum(),
            Self::Not(expr) | Self::IsNull { expr, .. } => expr.bind_count(),
            Self::InList { expr, list, .. } => expr.bind_count() + list.len(),
            Self::Between { expr, .. } => expr.bind_count() + 2,
            Self::Like { expr, .. } => expr.bind_count() + 1,
        }
    }

    pub(crate) fn render(&self, w: &mut SqlWriter) -> QueryResult<()> {
        match self {
            Self::Column(name) => w.push_ident(name)?,
            Self::Value(value) => w.push_bind(value.clone()),
            Self::Raw { sql, binds } => {
                w.push_str("(");
                w.push_raw(sql, binds)?;
                w.push_str(")");
            }
            Self::Binary { left, op, right } => {
                left.render(w)?;
                w.push_str(" ");
                w.push_str(op.as_sql());
                w.push_str(" ");
                right.render(w)?;
            }
            Self::And(parts) => render_group(w, parts, " AND ", "1 = 1")?,
            Self::Or(parts) => render_group(w, parts, " OR ", "1 = 0")?,
            Self::Not(expr) => {
                w.push_str("NOT (");
                expr.render(w)?;
                w.push_str(")");
            }
            Self::IsNull { expr, negated } => {
                expr.render(w)?;
                w.push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Self::InList {
                expr,
                list,
                negated,
            } => {
                // An empty list matches nothing; NOT IN an empty list matches everything.
                if list.is_empty() {
                    w.push_str(if *negated { "1 = 1" } else { "1 = 0" });
                    return Ok(());
                }
                expr.render(w)?;
                w.push_str(if *negated { " NOT IN (" } else { " IN (" });
                for (i, value) in list.iter().enumerate() {
                    if i > 0 {
                        w.push_str(", ");
                    }
                    w.push_bind(value.clone());
                }
                w.push_str(")");
            }
            Self::Between {
                expr,
                low,
                high,
                negated,
            } => {
                expr.render(w)?;
                w.push_str(if *negated { " NOT BETWEEN " } else { " BETWEEN " });
                w.push_bind(low.clone());
                w.push_str(" AND ");
                w.push_bind(high.clone());
            }
            Self::Like {
                expr,
                pattern,
                negated,
            } => {
                expr.render(w)?;
                w.push_str(if *negated { " NOT LIKE " } else { " LIKE " });
                w.push_bind(pattern.clone());
            }
        }
        Ok(())
    }
}

fn render_group(w: &mut SqlWriter, parts: &[Expr], sep: &str, empty: &str) -> QueryResult<()> {
    match parts {
        [] => w.push_str(empty),
        [only] => only.render(w)?,
        _ => {
            w.push_str("(");
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    w.push_str(sep);
                }
                part.render(w)?;
            }
            w.push_str(")");
        }
    }
    Ok(())
}
