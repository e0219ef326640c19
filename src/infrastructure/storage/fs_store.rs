use crate::domain::Deal;
use crate::error::Result;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Read-only local catalog used when the deals API cannot be reached.
#[derive(Clone)]
pub struct FileSystemStore {
    fallback_file: PathBuf,
}

impl FileSystemStore {
    pub fn new(fallback_file: impl Into<PathBuf>) -> Self {
        Self {
            fallback_file: fallback_file.into(),
        }
    }

    fn read_json_file<T: serde::de::DeserializeOwned>(&self) -> Result<Option<T>> {
        if self.fallback_file.exists() {
            let content = fs::read_to_string(&self.fallback_file)?;
            Ok(Some(serde_json::from_str(&content)?))
        } else {
            Ok(None)
        }
    }

    pub fn load_fallback_deals(&self) -> Result<Option<Vec<Deal>>> {
        let deals: Option<Vec<Deal>> = self.read_json_file()?;
        if let Some(deals) = &deals {
            info!(
                "Loaded {} fallback deals from {:?}",
                deals.len(),
                self.fallback_file
            );
        }
        Ok(deals)
    }
}
