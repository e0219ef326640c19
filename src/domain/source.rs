use super::Deal;
use crate::error::Result;
use async_trait::async_trait;

/// One page of the deals listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub store_id: u32,
    pub page_size: u32,
    pub page_number: u32,
}

#[async_trait]
pub trait DealSource: Send + Sync {
    /// Fetches a single page. No retries; an empty page is a successful
    /// result, not an error.
    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<Deal>>;
}
