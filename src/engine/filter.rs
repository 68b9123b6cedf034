use std::fmt;

use crate::storage::table::{Row, Value};

/// A single `column = value` predicate.
///
/// Only one predicate per query is supported; there is no AND/OR.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub value: Value,
}

impl Filter {
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Exact, type-sensitive equality. A row without the column never matches.
    pub fn matches(&self, row: &Row) -> bool {
        row.get(&self.column) == Some(&self.value)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Value::Str(s) => write!(f, "{}=\"{}\"", self.column, s),
            other => write!(f, "{}={}", self.column, other),
        }
    }
}

/// One `column = value` pair of an update's SET clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub value: Value,
}

impl Assignment {
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Row {
        [
            ("ID", Value::Int(1)),
            ("n", Value::Int(1)),
            ("flag", Value::Bool(true)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_matches() {
        assert!(Filter::new("n", 1i64).matches(&row()));
        assert!(!Filter::new("n", 2i64).matches(&row()));
        assert!(!Filter::new("missing", 1i64).matches(&row()));
    }

    #[test]
    fn test_bool_does_not_match_int() {
        assert!(!Filter::new("flag", 1i64).matches(&row()));
        assert!(!Filter::new("n", true).matches(&row()));
        assert!(Filter::new("flag", true).matches(&row()));
    }

    #[test]
    fn test_display() {
        assert_eq!(Filter::new("a", 5i64).to_string(), "a=5");
        assert_eq!(Filter::new("b", "x").to_string(), "b=\"x\"");
    }
}
