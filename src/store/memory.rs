//! In-memory document store
//!
//! Collections are keyed by collection path and hold documents ordered by
//! identifier. Query execution follows document-database semantics:
//! ordering on a field excludes documents missing it, every query is
//! implicitly tie-broken by document id, and `StartAfter` compares the
//! cursor against the ordering key tuple.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::RwLock;

use serde_json::Value;
use uuid::Uuid;

use super::compare::{compare_values, matches};
use super::document::Document;
use super::errors::{StoreError, StoreResult};
use super::query::{Direction, OrderClause, Query, DOCUMENT_ID};
use super::DocumentStore;

type Collection = BTreeMap<String, Value>;

/// Thread-safe in-memory store
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from `{ "<collection>": [ { "id": ..., ...fields } ] }`
    pub fn from_seed(seed: Value) -> StoreResult<Self> {
        let store = Self::new();
        let collections = match seed {
            Value::Object(map) => map,
            _ => return Err(StoreError::InvalidSeed("seed must be an object".into())),
        };

        for (collection, docs) in collections {
            let docs = match docs {
                Value::Array(docs) => docs,
                _ => {
                    return Err(StoreError::InvalidSeed(format!(
                        "collection '{}' must be an array",
                        collection
                    )))
                }
            };
            for doc in docs {
                let mut body = match doc {
                    Value::Object(body) => body,
                    _ => {
                        return Err(StoreError::InvalidSeed(format!(
                            "documents in '{}' must be objects",
                            collection
                        )))
                    }
                };
                let id = match body.remove("id") {
                    Some(Value::String(id)) => Some(id),
                    Some(other) => {
                        return Err(StoreError::InvalidSeed(format!(
                            "document id must be a string, found {}",
                            other
                        )))
                    }
                    None => None,
                };
                store.insert(&collection, id, Value::Object(body))?;
            }
        }
        Ok(store)
    }

    /// Loads seed data from a JSON file
    pub fn load(path: &Path) -> StoreResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| StoreError::InvalidSeed(format!("failed to read {}: {}", path.display(), e)))?;
        let seed: Value = serde_json::from_str(&content)
            .map_err(|e| StoreError::InvalidSeed(format!("invalid JSON: {}", e)))?;
        Self::from_seed(seed)
    }

    /// Inserts or replaces a document; generates a UUID when `id` is `None`
    pub fn insert(&self, collection: &str, id: Option<String>, data: Value) -> StoreResult<String> {
        let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::Unavailable("collection lock poisoned".into()))?;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), data);
        Ok(id)
    }
}

impl DocumentStore for InMemoryStore {
    fn documents(&self, query: &Query) -> StoreResult<Vec<Document>> {
        let ordering = effective_ordering(&query.order_by);
        if let Some(cursor) = &query.start_after {
            if cursor.len() > ordering.len() {
                return Err(StoreError::InvalidQuery(format!(
                    "cursor has {} values but the query orders by {} fields",
                    cursor.len(),
                    ordering.len()
                )));
            }
        }

        let mut docs: Vec<Document> = {
            let collections = self
                .collections
                .read()
                .map_err(|_| StoreError::Unavailable("collection lock poisoned".into()))?;
            match collections.get(&query.collection) {
                Some(collection) => collection
                    .iter()
                    .map(|(id, data)| Document::new(id.clone(), data.clone()))
                    .collect(),
                None => Vec::new(),
            }
        };

        docs.retain(|doc| {
            query
                .predicates
                .iter()
                .all(|p| matches(doc.field(&p.path).as_deref(), p.op, &p.value))
        });

        // Ordering on a field excludes documents without it
        docs.retain(|doc| ordering.iter().all(|c| doc.field(&c.path).is_some()));
        docs.sort_by(|a, b| compare_keys(a, b, &ordering));

        if let Some(cursor) = &query.start_after {
            docs.retain(|doc| compare_to_cursor(doc, cursor, &ordering) == Ordering::Greater);
        }

        if let Some(limit) = query.limit {
            docs.truncate(limit);
        }
        Ok(docs)
    }
}

/// Explicit clauses plus an implicit ascending document id tie-breaker
fn effective_ordering(order_by: &[OrderClause]) -> Vec<OrderClause> {
    let mut ordering = order_by.to_vec();
    if !ordering.iter().any(|c| c.path == DOCUMENT_ID) {
        ordering.push(OrderClause {
            path: DOCUMENT_ID.to_string(),
            direction: Direction::Asc,
        });
    }
    ordering
}

fn directed(ordering: Ordering, direction: Direction) -> Ordering {
    match direction {
        Direction::Asc => ordering,
        Direction::Desc => ordering.reverse(),
    }
}

fn compare_keys(a: &Document, b: &Document, ordering: &[OrderClause]) -> Ordering {
    for clause in ordering {
        let (av, bv) = (a.field(&clause.path), b.field(&clause.path));
        let ord = match (av, bv) {
            (Some(av), Some(bv)) => compare_values(&av, &bv),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        let ord = directed(ord, clause.direction);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

fn compare_to_cursor(doc: &Document, cursor: &[Value], ordering: &[OrderClause]) -> Ordering {
    for (clause, bound) in ordering.iter().zip(cursor) {
        let ord = match doc.field(&clause.path) {
            Some(value) => compare_values(&value, bound),
            None => Ordering::Less,
        };
        let ord = directed(ord, clause.direction);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    // A document equal to the cursor prefix is not after it
    Ordering::Equal
}
