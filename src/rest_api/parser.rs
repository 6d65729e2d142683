//! # Query Parameter Parser
//!
//! Parses list query parameters into a `ListRequest`.

use std::collections::HashMap;

use crate::transpiler::ListRequest;

use super::errors::{RestError, RestResult};

/// Parse `parent`, `filter`, `page_size` and `page_token`; other keys are ignored
pub fn parse_list_request(params: &HashMap<String, String>) -> RestResult<ListRequest> {
    let mut request = ListRequest::default();

    for (key, value) in params {
        match key.as_str() {
            "parent" => request.parent = value.clone(),
            "filter" => request.filter = value.clone(),
            "page_token" => request.page_token = value.clone(),
            "page_size" => request.page_size = parse_page_size(value)?,
            _ => {}
        }
    }

    Ok(request)
}

/// Sign is left to the transpiler, which rejects negative sizes itself
fn parse_page_size(value: &str) -> RestResult<i32> {
    if value.is_empty() {
        return Ok(0);
    }
    value.parse::<i32>().map_err(|_| {
        RestError::InvalidQueryParam(format!("page_size must be an integer, got '{}'", value))
    })
}
