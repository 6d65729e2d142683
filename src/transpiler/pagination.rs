//! Page sizing and cursor stitching

use serde_json::Value;

use crate::store::{Direction, DOCUMENT_ID};

use super::errors::{TranspileError, TranspileResult};
use super::state::QueryState;

/// Default page size when the request leaves it unset
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Upper bound applied to every request
pub const MAX_PAGE_SIZE: usize = 1000;

/// Page size bounds for one endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSizeLimits {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for PageSizeLimits {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl PageSizeLimits {
    /// Negative sizes are rejected, zero selects the default, larger sizes clamp
    pub fn resolve(&self, page_size: i32) -> TranspileResult<usize> {
        if page_size < 0 {
            return Err(TranspileError::invalid_argument(format!(
                "page size must not be negative, got {}",
                page_size
            )));
        }
        if page_size == 0 {
            return Ok(self.default_page_size.min(self.max_page_size));
        }
        Ok((page_size as usize).min(self.max_page_size))
    }
}

/// Continues after `page_token` by ordering on the document id last, then
/// applies every queued cursor value as one `StartAfter`.
pub fn stitch_cursor(state: &mut QueryState, page_token: &str) {
    if !page_token.is_empty() {
        state.add_ordering(DOCUMENT_ID, Direction::Asc, Value::String(page_token.to_string()));
    }
    state.apply_cursor();
}
