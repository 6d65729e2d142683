//! Query builder surface
//!
//! Accumulates `Where`, `OrderBy`, `StartAfter` and `Limit` clauses for a
//! single collection. Builders mutate in place; the value is executed by a
//! `DocumentStore`.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Field path addressing the document identifier
pub const DOCUMENT_ID: &str = "__name__";

/// Comparison operators understood by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operator {
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanOrEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
        }
    }

    /// Range operators occupy the single inequality field of a query
    pub fn is_inequality(&self) -> bool {
        !matches!(self, Operator::Equal | Operator::NotEqual)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

/// `path <op> value`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Predicate {
    pub path: String,
    pub op: Operator,
    pub value: Value,
}

/// `ORDER BY path direction`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderClause {
    pub path: String,
    pub direction: Direction,
}

/// A query against one collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    /// Collection path, `<parent>/<collection>` or `<collection>`
    pub collection: String,
    pub predicates: Vec<Predicate>,
    pub order_by: Vec<OrderClause>,
    /// Cursor values, positionally matched to `order_by`
    pub start_after: Option<Vec<Value>>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            predicates: Vec::new(),
            order_by: Vec::new(),
            start_after: None,
            limit: None,
        }
    }

    /// Adds a `Where(path, op, value)` clause
    pub fn filter(&mut self, path: impl Into<String>, op: Operator, value: Value) -> &mut Self {
        self.predicates.push(Predicate {
            path: path.into(),
            op,
            value,
        });
        self
    }

    /// Adds an `OrderBy(path, direction)` clause
    pub fn order_by(&mut self, path: impl Into<String>, direction: Direction) -> &mut Self {
        self.order_by.push(OrderClause {
            path: path.into(),
            direction,
        });
        self
    }

    /// Sets the `StartAfter` cursor, replacing any previous one
    pub fn start_after(&mut self, values: Vec<Value>) -> &mut Self {
        self.start_after = Some(values);
        self
    }

    pub fn limit(&mut self, n: usize) -> &mut Self {
        self.limit = Some(n);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_accumulates_in_order() {
        let mut query = Query::new("users");
        query
            .filter("age", Operator::GreaterThan, json!(30))
            .order_by("age", Direction::Asc)
            .order_by(DOCUMENT_ID, Direction::Asc)
            .start_after(vec![json!(40), json!("u1")])
            .limit(10);

        assert_eq!(query.predicates.len(), 1);
        assert_eq!(query.order_by[1].path, DOCUMENT_ID);
        assert_eq!(query.start_after, Some(vec![json!(40), json!("u1")]));
        assert_eq!(query.limit, Some(10));
    }

    #[test]
    fn test_inequality_classification() {
        assert!(!Operator::Equal.is_inequality());
        assert!(!Operator::NotEqual.is_inequality());
        assert!(Operator::LessThan.is_inequality());
        assert!(Operator::GreaterThanOrEqual.is_inequality());
    }

    #[test]
    fn test_serializes_operators_symbolically() {
        let mut query = Query::new("users");
        query.filter("age", Operator::LessThanOrEqual, json!(1));
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value["predicates"][0]["op"], "<=");
    }
}
