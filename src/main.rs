mod api;
mod config;
mod export;
mod forms;
mod logging;
mod models;
mod routes;
mod run;
mod session;
mod storage;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

use config::{paths, Config};
use routes::Navigator;
use session::SessionStore;
use storage::SqliteStorage;

fn main() -> Result<()> {
    let cli = run::Cli::parse();
    if let Some(run::Commands::Config { command }) = &cli.command {
        return run::as_config(command);
    }

    let config = Config::load()?;
    let _log_guard = logging::init(&paths::log_dir()?, &config.log_level);

    let storage = SqliteStorage::open(&paths::storage_path()?)?;
    let session = Arc::new(SessionStore::new(Arc::new(storage)));
    let (navigator, redirects) = Navigator::channel();
    let client = Arc::new(api::ApiClient::new(&config, session, navigator)?);

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    match cli.command {
        None => run::as_tui(
            runtime.handle().clone(),
            client,
            redirects,
            config.download_dir(),
        ),
        Some(command) => {
            client.session().hydrate()?;
            let result = runtime.block_on(run::as_cli(command, &client, &config));
            if let Err(ref e) = result {
                tracing::error!(error = %e, "Command failed");
            }
            result
        }
    }
}
