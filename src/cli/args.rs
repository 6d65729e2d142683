//! CLI argument definitions using clap
//!
//! Commands:
//! - filterstore serve --config <path>
//! - filterstore query --config <path> --collection <name> [--filter <text>] ...

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// filterstore - AIP-160 filtered listing over a document store
#[derive(Parser, Debug)]
#[command(name = "filterstore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Serve the configured collections over HTTP
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./filterstore.json")]
        config: PathBuf,
    },

    /// List one page of a collection and exit
    Query {
        /// Path to configuration file
        #[arg(long, default_value = "./filterstore.json")]
        config: PathBuf,

        /// Collection to list
        #[arg(long)]
        collection: String,

        /// Parent resource name
        #[arg(long, default_value = "")]
        parent: String,

        /// AIP-160 filter
        #[arg(long, default_value = "")]
        filter: String,

        /// Page size; 0 selects the configured default
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        page_size: i32,

        /// Token from a previous page
        #[arg(long, default_value = "")]
        page_token: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
