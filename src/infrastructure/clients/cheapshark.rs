use crate::domain::{Deal, DealSource, PageRequest};
use crate::error::{DealError, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info};

pub const DEFAULT_BASE_URL: &str = "https://www.cheapshark.com";

pub struct CheapSharkClient {
    client: Client,
    base_url: String,
}

impl CheapSharkClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("Created new CheapShark client for {}", base_url);
        Self { client, base_url }
    }

    pub fn deals_url(&self) -> String {
        format!("{}/api/1.0/deals", self.base_url)
    }
}

#[async_trait]
impl DealSource for CheapSharkClient {
    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<Deal>> {
        debug!(
            "Requesting deals page {} (size {}) for store {}",
            request.page_number, request.page_size, request.store_id
        );

        let response = self
            .client
            .get(self.deals_url())
            .query(&[
                ("storeID", request.store_id),
                ("pageSize", request.page_size),
                ("pageNumber", request.page_number),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            error!("Deals API error: Status {}", response.status());
            return Err(DealError::Response {
                status: response.status(),
            });
        }

        let body = response.text().await?;
        let deals: Vec<Deal> = serde_json::from_str(&body)?;
        info!(
            "Fetched {} deals from page {}",
            deals.len(),
            request.page_number
        );
        Ok(deals)
    }
}
