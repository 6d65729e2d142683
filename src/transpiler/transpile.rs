//! List entrypoint
//!
//! Validates the page size, parses the filter, walks it into a query,
//! stitches the pagination cursor, executes and maps the documents.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::filtering::{parse_filter, Declarations};
use crate::store::{DocumentStore, Query, StoreError, DOCUMENT_ID};

use super::errors::TranspileResult;
use super::pagination::{stitch_cursor, PageSizeLimits};
use super::state::QueryState;
use super::walker::Walker;

/// Inbound list request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListRequest {
    /// Resource name of the collection's parent; empty for a top-level collection
    pub parent: String,
    pub page_size: i32,
    /// Opaque continuation token from a previous response
    pub page_token: String,
    /// AIP-160 filter text
    pub filter: String,
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    /// Empty when there are no further pages
    pub next_page_token: String,
}

/// Transpiles list requests for one collection into store queries
#[derive(Debug)]
pub struct Transpiler<S> {
    store: S,
    collection: String,
    declarations: Declarations,
    limits: PageSizeLimits,
}

impl<S: DocumentStore> Transpiler<S> {
    pub fn new(
        store: S,
        collection: impl Into<String>,
        declarations: Declarations,
        limits: PageSizeLimits,
    ) -> Self {
        Self {
            store,
            collection: collection.into(),
            declarations,
            limits,
        }
    }

    /// `<parent>/<collection>`, or the bare collection for an empty parent
    pub fn collection_path(&self, parent: &str) -> String {
        let parent = parent.trim_matches('/');
        if parent.is_empty() {
            self.collection.clone()
        } else {
            format!("{}/{}", parent, self.collection)
        }
    }

    /// Builds the query for `request` without executing it
    pub fn plan(&self, request: &ListRequest) -> TranspileResult<Query> {
        let limit = self.limits.resolve(request.page_size)?;
        let checked = parse_filter(&request.filter, &self.declarations)?;

        let mut state = QueryState::new(self.collection_path(&request.parent), limit);
        Walker::new(&checked.type_map, self.declarations.root.as_deref(), &mut state)
            .walk(checked.expr.as_ref(), false)?;
        stitch_cursor(&mut state, &request.page_token);

        Ok(state.into_query())
    }

    /// Runs `request` and maps each document body into `T`
    pub fn transpile<T: DeserializeOwned>(
        &self,
        request: &ListRequest,
    ) -> TranspileResult<ListResponse<T>> {
        let query = self.plan(request)?;
        let docs = self.store.documents(&query)?;

        // A full page may have a successor; a short page is the last one.
        // An id token only resumes a walk ordered by id alone, so pages
        // ordered on a filtered field end after one page.
        let resumable = query.order_by.iter().all(|c| c.path == DOCUMENT_ID);
        let next_page_token = match (query.limit, docs.last()) {
            (Some(limit), Some(last)) if resumable && limit > 0 && docs.len() >= limit => {
                last.id.clone()
            }
            _ => String::new(),
        };

        let items = docs
            .iter()
            .map(|doc| {
                doc.data_to::<T>().map_err(|e| StoreError::Decode {
                    id: doc.id.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<T>, StoreError>>()?;

        Ok(ListResponse {
            items,
            next_page_token,
        })
    }
}
