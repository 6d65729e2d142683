//! CLI command implementations
//!
//! Both commands load the configuration, seed the in-memory store and build
//! one transpiler per configured collection before doing any work.

use std::path::Path;
use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::observability::{log_event_with_fields, Event};
use crate::rest_api::{serve as serve_http, ListService};
use crate::store::InMemoryStore;
use crate::transpiler::ListRequest;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config } => serve(&config),
        Command::Query {
            config,
            collection,
            parent,
            filter,
            page_size,
            page_token,
        } => query(
            &config,
            &collection,
            ListRequest {
                parent,
                page_size,
                page_token,
                filter,
            },
        ),
    }
}

/// Load configuration and seed data, then build the list service
pub fn boot(config_path: &Path) -> CliResult<(ServiceConfig, ListService<Arc<InMemoryStore>>)> {
    let config = ServiceConfig::load(config_path)?;
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("endpoints", config.endpoints.len().to_string().as_str()),
            ("path", config_path.display().to_string().as_str()),
        ],
    );

    let store = match &config.seed_path {
        Some(seed) => {
            let store = InMemoryStore::load(seed)?;
            log_event_with_fields(Event::StoreLoaded, &[("path", seed.display().to_string().as_str())]);
            store
        }
        None => InMemoryStore::new(),
    };

    let service = ListService::from_config(&config, Arc::new(store));
    Ok((config, service))
}

/// Serve every configured collection over HTTP until interrupted
pub fn serve(config_path: &Path) -> CliResult<()> {
    let (config, service) = boot(config_path)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        serve_http(service, &config.listen_address)
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// List one page and print it as JSON
pub fn query(config_path: &Path, collection: &str, request: ListRequest) -> CliResult<()> {
    let (_config, service) = boot(config_path)?;

    match service.list(collection, &request) {
        Ok(page) => write_response(&page),
        Err(err) => {
            write_error(err.code(), &err.to_string())?;
            Err(err.into())
        }
    }
}
