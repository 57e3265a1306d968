//! The query-builder seam.
//!
//! Field kinds never build SQL themselves. A relationship hands the query
//! builder a join through [`QueryBuilder`], and a lazy `get` hands back a
//! [`LazyQuery`] descriptor for an executor to run later.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Kind of SQL join.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinType {
    /// INNER JOIN
    Inner,
    /// LEFT JOIN
    #[default]
    Left,
    /// RIGHT JOIN
    Right,
}

impl JoinType {
    /// SQL keyword(s) for this join.
    pub const fn as_sql(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
        }
    }
}

/// The part of a query builder a joinable field talks to.
pub trait QueryBuilder {
    /// Add a join of `table`, aliased as `alias`.
    fn join(&mut self, table: &str, alias: &str, kind: JoinType);

    /// Add a predicate to the most recently added join.
    fn on(&mut self, left: &str, op: &str, right: &str);
}

/// A single `column op value` predicate.
///
/// `column` is a logical field name of the query's model; the executor maps it
/// to a physical column through the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub op: String,
    pub value: Value,
}

impl Condition {
    pub fn new(column: impl Into<String>, op: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            op: op.into(),
            value: value.into(),
        }
    }
}

/// A query that has been described but not executed.
#[derive(Debug, Clone, PartialEq)]
pub struct LazyQuery {
    /// Model the query selects from.
    pub model: String,
    /// Conjunction of predicates.
    pub conditions: Vec<Condition>,
    /// Row limit, if any.
    pub limit: Option<u64>,
    /// Whether the executor should return a single record instead of a set.
    pub unique: bool,
}

impl LazyQuery {
    /// Start a query over `model`.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            conditions: Vec::new(),
            limit: None,
            unique: false,
        }
    }

    /// Add a predicate.
    pub fn filter(
        mut self,
        column: impl Into<String>,
        op: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.conditions.push(Condition::new(column, op, value));
        self
    }

    /// Limit the result. With `unique`, the executor yields one record, not a set.
    pub fn limit(mut self, limit: u64, unique: bool) -> Self {
        self.limit = Some(limit);
        self.unique = unique;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_query_builder_chain() {
        let query = LazyQuery::new("author")
            .limit(1, true)
            .filter("id", "=", 7i64);

        assert_eq!(query.model, "author");
        assert_eq!(query.limit, Some(1));
        assert!(query.unique);
        assert_eq!(query.conditions, vec![Condition::new("id", "=", 7i64)]);
    }

    #[test]
    fn test_join_type_sql() {
        assert_eq!(JoinType::default().as_sql(), "LEFT JOIN");
        assert_eq!(JoinType::Inner.as_sql(), "INNER JOIN");
    }
}
