//! Validated SQL identifiers.

use crate::{QueryError, QueryResult};
use std::fmt;

/// A table or column name, optionally qualified (`posts.created_at`).
///
/// Every part must match `[A-Za-z_][A-Za-z0-9_]*`. Identifiers are always
/// rendered double-quoted, so reserved words such as `type` are safe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident(String);

impl Ident {
    /// Validates `name` as an identifier.
    pub fn parse(name: &str) -> QueryResult<Self> {
        if is_valid_identifier(name) {
            Ok(Self(name.to_string()))
        } else {
            Err(QueryError::InvalidIdentifier(name.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The unqualified name: the last dotted segment.
    #[must_use]
    pub fn base_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    pub(crate) fn write_quoted(&self, out: &mut String) {
        for (i, part) in self.0.split('.').enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push('"');
            out.push_str(part);
            out.push('"');
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns true if `name` is a plain, optionally dotted, identifier.
#[must_use]
pub fn is_valid_identifier(name: &str) -> bool {
    !name.is_empty() && name.split('.').all(is_valid_part)
}

fn is_valid_part(part: &str) -> bool {
    let mut chars = part.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
