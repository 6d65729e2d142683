//! Document store boundary
//!
//! The transpiler emits `Where`, `OrderBy`, `StartAfter` and `Limit` clauses
//! into a `Query` and hands it to a `DocumentStore` for execution. Execution
//! is the only blocking call site; failures propagate unmodified.

mod compare;
mod document;
mod errors;
mod memory;
mod query;

use std::sync::Arc;

pub use compare::{compare_values, matches};
pub use document::Document;
pub use errors::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use query::{Direction, Operator, OrderClause, Predicate, Query, DOCUMENT_ID};

/// Executes queries against a collection of documents
pub trait DocumentStore: Send + Sync {
    /// Runs the query and returns all matches for the current page
    fn documents(&self, query: &Query) -> StoreResult<Vec<Document>>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    fn documents(&self, query: &Query) -> StoreResult<Vec<Document>> {
        (**self).documents(query)
    }
}
