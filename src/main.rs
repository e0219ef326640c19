use crate::config::cli::{Args, Command};
use crate::config::Config;
use crate::domain::Query;
use crate::error::Result;
use crate::infrastructure::{CheapSharkClient, FileSystemStore, TerminalRenderer};
use crate::services::CatalogService;
use clap::Parser;
use tracing::info;

mod config;
mod domain;
mod error;
mod infrastructure;
mod interactive;
mod services;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = Config::log_level(&args)?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_args(args)?;

    let client = CheapSharkClient::new(config.http_client.clone(), &config.args.base_url);
    let renderer = TerminalRenderer::new(std::io::stdout(), config.args.plain, !config.args.plain);
    let mut catalog = CatalogService::new(client, renderer, config.catalog_settings());
    if let Some(path) = &config.args.fallback_file {
        catalog = catalog.with_fallback(FileSystemStore::new(path));
    }

    match config.args.command.clone().unwrap_or(Command::Browse) {
        Command::Browse => interactive::run(&mut catalog).await?,
        Command::List { search, sort } => {
            let query = Query::new(search.unwrap_or_default(), sort.unwrap_or_default());
            if query.is_active() {
                catalog.load_refined(query).await;
            } else {
                catalog.initial_load().await;
            }
        }
    }

    info!("Catalog session finished");
    Ok(())
}
