//! Query state
//!
//! The in-progress query for one transpile call, with the single field
//! allowed in inequality comparisons and the cursor values queued for
//! `StartAfter`. Owned by exactly one call and discarded afterwards.

use serde_json::Value;

use crate::store::{Direction, Operator, Query};

use super::errors::{TranspileError, TranspileResult};

#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    query: Query,
    // The store indexes range comparisons and existence orderings on one
    // field per query; a second distinct field rejects the filter.
    inequality: Option<String>,
    // Parallel to the ordering clauses added through `add_ordering`
    cursor: Vec<Value>,
}

impl QueryState {
    /// Starts a query on `collection` returning at most `limit` documents
    pub fn new(collection: impl Into<String>, limit: usize) -> Self {
        let mut query = Query::new(collection);
        query.limit(limit);
        Self {
            query,
            inequality: None,
            cursor: Vec::new(),
        }
    }

    /// Claims the inequality field for `path`.
    ///
    /// Idempotent for the field already claimed; fails for any other field.
    pub fn claim_inequality(&mut self, path: &str) -> TranspileResult<()> {
        match &self.inequality {
            None => {
                self.inequality = Some(path.to_string());
                Ok(())
            }
            Some(claimed) if claimed == path => Ok(()),
            Some(_) => Err(TranspileError::invalid_argument(
                "inequality can only be used on a single field",
            )),
        }
    }

    /// Adds `path <op> value`
    pub fn add_predicate(&mut self, path: impl Into<String>, op: Operator, value: Value) {
        self.query.filter(path, op, value);
    }

    /// Adds an ordering clause together with its cursor value
    pub fn add_ordering(&mut self, path: impl Into<String>, direction: Direction, cursor: Value) {
        self.cursor.push(cursor);
        self.query.order_by(path, direction);
    }

    /// Applies the queued cursor values as a single `StartAfter`, if any
    pub fn apply_cursor(&mut self) {
        if !self.cursor.is_empty() {
            self.query.start_after(self.cursor.clone());
        }
    }

    pub fn inequality(&self) -> Option<&str> {
        self.inequality.as_deref()
    }

    pub fn cursor(&self) -> &[Value] {
        &self.cursor
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn into_query(self) -> Query {
        self.query
    }
}
