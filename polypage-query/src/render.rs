//! SQL text rendering.

use crate::{Ident, QueryError, QueryResult};
use polypage_types::Value;
use std::fmt::Write;

/// Placeholder style of the target database.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Anonymous `?` placeholders.
    #[default]
    Sqlite,
    /// Numbered `$1, $2, ...` placeholders.
    Postgres,
}

/// Rendered SQL text plus its bound values, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub binds: Vec<Value>,
}

/// Accumulates SQL text and binds in lockstep.
pub(crate) struct SqlWriter {
    dialect: Dialect,
    sql: String,
    binds: Vec<Value>,
}

impl SqlWriter {
    pub(crate) fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            sql: String::new(),
            binds: Vec::new(),
        }
    }

    pub(crate) fn push_str(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    pub(crate) fn push_ident(&mut self, name: &str) -> QueryResult<()> {
        Ident::parse(name)?.write_quoted(&mut self.sql);
        Ok(())
    }

    pub(crate) fn push_bind(&mut self, value: Value) {
        self.binds.push(value);
        self.push_placeholder();
    }

    fn push_placeholder(&mut self) {
        match self.dialect {
            Dialect::Sqlite => self.sql.push('?'),
            Dialect::Postgres => {
                let _ = write!(self.sql, "${}", self.binds.len());
            }
        }
    }

    /// Writes a raw fragment, replacing each `?` placeholder with this
    /// dialect's placeholder for the next bind.
    ///
    /// A `?` inside a string literal, a double-quoted identifier or a comment
    /// is copied through unchanged.
    pub(crate) fn push_raw(&mut self, sql: &str, binds: &[Value]) -> QueryResult<()> {
        let offsets = placeholder_offsets(sql);
        if offsets.len() != binds.len() {
            return Err(QueryError::BindCountMismatch {
                expected: offsets.len(),
                found: binds.len(),
            });
        }

        let mut start = 0;
        for (&offset, value) in offsets.iter().zip(binds) {
            self.sql.push_str(&sql[start..offset]);
            self.push_bind(value.clone());
            start = offset + 1;
        }
        self.sql.push_str(&sql[start..]);
        Ok(())
    }

    /// Writes a value inline as a SQL literal.
    pub(crate) fn push_literal(&mut self, value: &Value) {
        match value {
            Value::Null => self.sql.push_str("NULL"),
            Value::Integer(i) => {
                let _ = write!(self.sql, "{i}");
            }
            Value::Real(r) if r.is_finite() => {
                let _ = write!(self.sql, "{r:?}");
            }
            Value::Real(_) => self.sql.push_str("NULL"),
            Value::Text(s) => {
                self.sql.push('\'');
                self.sql.push_str(&s.replace('\'', "''"));
                self.sql.push('\'');
            }
            Value::Blob(bytes) => {
                self.sql.push_str("X'");
                for b in bytes {
                    let _ = write!(self.sql, "{b:02X}");
                }
                self.sql.push('\'');
            }
        }
    }

    pub(crate) fn finish(self) -> Statement {
        Statement {
            sql: self.sql,
            binds: self.binds,
        }
    }
}

enum Scan {
    Code,
    Quoted(char),
    LineComment,
    BlockComment,
}

/// Byte offsets of the bind placeholders in a raw fragment.
fn placeholder_offsets(sql: &str) -> Vec<usize> {
    let mut offsets = Vec::new();
    let mut state = Scan::Code;
    let mut chars = sql.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        state = match state {
            Scan::Code => match c {
                '\'' | '"' => Scan::Quoted(c),
                '-' if chars.next_if(|&(_, n)| n == '-').is_some() => Scan::LineComment,
                '/' if chars.next_if(|&(_, n)| n == '*').is_some() => Scan::BlockComment,
                '?' => {
                    offsets.push(i);
                    Scan::Code
                }
                _ => Scan::Code,
            },
            // A doubled quote closes and reopens, which leaves it quoted.
            Scan::Quoted(q) if c == q => Scan::Code,
            Scan::LineComment if c == '\n' => Scan::Code,
            Scan::BlockComment if c == '*' && chars.next_if(|&(_, n)| n == '/').is_some() => {
                Scan::Code
            }
            other => other,
        };
    }
    offsets
}
