//! # REST API Module
//!
//! HTTP list endpoints, one per configured collection:
//!
//! - `GET /v1/:collection?parent=&filter=&page_size=&page_token=`
//! - `GET /metrics`
//! - `GET /health`

pub mod errors;
pub mod parser;
pub mod server;

pub use errors::{ErrorResponse, RestError, RestResult};
pub use parser::parse_list_request;
pub use server::{router, serve, HealthResponse, ListService};
