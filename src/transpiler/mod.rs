//! Filter-to-query transpiler
//!
//! Walks a checked AIP-160 expression and drives a document-store query.
//!
//! # Constraints
//!
//! - At most one field per query may appear in a range comparison or an
//!   existence ordering
//! - `NOT` flips each comparison to its complement
//! - Every ordering clause has a cursor value at the same position
//! - Paths are lower camel cased

mod constant;
mod errors;
mod operator;
mod pagination;
mod path;
mod state;
mod transpile;
mod walker;

pub use constant::unwrap_constant;
pub use errors::{TranspileError, TranspileResult};
pub use operator::{complement, operator};
pub use pagination::{stitch_cursor, PageSizeLimits, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use path::{resolve_path, store_case};
pub use state::QueryState;
pub use transpile::{ListRequest, ListResponse, Transpiler};
pub use walker::Walker;
