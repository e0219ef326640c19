use crate::domain::SortKey;
use crate::infrastructure::DEFAULT_BASE_URL;
use crate::services::pagination::DEFAULT_PAGE_SIZE;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Base URL of the deals API
    #[arg(long, env = "DEALSHELF_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Store whose deals are listed
    #[arg(long, default_value_t = 1)]
    pub store_id: u32,

    /// Deals per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// How the first batch of deals is fetched
    #[arg(long, value_enum, default_value_t = Strategy::Prefetch)]
    pub strategy: Strategy,

    /// Deals fetched up front with the prefetch strategy
    #[arg(long, default_value_t = 60)]
    pub prefetch_size: u32,

    /// Local JSON catalog shown when the deals API is unreachable
    #[arg(long, env = "DEALSHELF_FALLBACK_FILE")]
    pub fallback_file: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Disable ANSI styling and the loading spinner
    #[arg(long)]
    pub plain: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Browse deals interactively (default)
    Browse,
    /// Print the first page of deals and exit
    List {
        /// Only show deals whose title contains this text
        #[arg(long)]
        search: Option<String>,

        /// Order by rating, recent, name or none
        #[arg(long)]
        sort: Option<SortKey>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Cache a large first batch, render one page of it
    Prefetch,
    /// Fetch one page at a time
    PerPage,
}
