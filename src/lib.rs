//! filterstore - AIP-160 filtered listing over a document store
//!
//! A filter string is parsed and type-checked against declared identifiers,
//! then walked into a store query with pagination stitched on.
//!
//! - `filtering`: lexer, parser, checker and declarations
//! - `transpiler`: expression walk, operator mapping, pagination
//! - `store`: query surface and the in-memory document store
//! - `rest_api`, `cli`, `config`, `observability`: the service around it

pub mod cli;
pub mod config;
pub mod filtering;
pub mod observability;
pub mod rest_api;
pub mod store;
pub mod transpiler;
