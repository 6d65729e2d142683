//! CLI module for filterstore
//!
//! Provides command-line interface for:
//! - serve: Serve the configured collections over HTTP
//! - query: One-shot list of a single page

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{boot, query, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
