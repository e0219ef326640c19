use crate::config::cli::{Args, Strategy};
use crate::error::{DealError, Result};
use crate::services::{CatalogSettings, LoadStrategy};
use reqwest::Client;
use std::time::Duration;
use tracing::{info, Level};

pub(crate) mod cli;

pub struct Config {
    pub args: Args,
    pub http_client: Client,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self> {
        Self::validate(&args)?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(args.timeout_secs))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()?;

        info!(
            "Using {} for store {} ({:?}, page size {})",
            args.base_url, args.store_id, args.strategy, args.page_size
        );

        Ok(Self { args, http_client })
    }

    pub fn log_level(args: &Args) -> Result<Level> {
        args.log_level
            .parse()
            .map_err(|_| DealError::Config(format!("unknown log level '{}'", args.log_level)))
    }

    fn validate(args: &Args) -> Result<()> {
        Self::log_level(args)?;
        if args.page_size == 0 {
            return Err(DealError::Config("page size must be at least 1".into()));
        }
        if args.strategy == Strategy::Prefetch && args.prefetch_size < args.page_size {
            return Err(DealError::Config(format!(
                "prefetch size {} is smaller than page size {}",
                args.prefetch_size, args.page_size
            )));
        }
        if args.timeout_secs == 0 {
            return Err(DealError::Config("timeout must be at least 1 second".into()));
        }
        Ok(())
    }

    pub fn catalog_settings(&self) -> CatalogSettings {
        let strategy = match self.args.strategy {
            Strategy::Prefetch => LoadStrategy::Prefetch {
                size: self.args.prefetch_size,
            },
            Strategy::PerPage => LoadStrategy::PerPage,
        };

        CatalogSettings {
            store_id: self.args.store_id,
            page_size: self.args.page_size,
            strategy,
            redirect_base: self.args.base_url.clone(),
        }
    }
}
