use crate::domain::{Deal, DealSource, PageRequest};
use crate::error::{DealError, Result};
use tracing::info;

pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Page-by-page walk over the deals listing. The cursor itself lives in the
/// session so a reset also rewinds pagination.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    store_id: u32,
    page_size: u32,
}

impl Paginator {
    pub fn new(store_id: u32, page_size: u32) -> Self {
        Self {
            store_id,
            page_size,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn request(&self, page_number: u32) -> PageRequest {
        PageRequest {
            store_id: self.store_id,
            page_size: self.page_size,
            page_number,
        }
    }

    /// Fetches the page at `cursor`. The cursor moves forward only when the
    /// page has deals; an empty page yields `DealError::EmptyPage` and leaves
    /// it where it was.
    pub async fn advance<S>(&self, source: &S, cursor: &mut u32) -> Result<Vec<Deal>>
    where
        S: DealSource + ?Sized,
    {
        let deals = source.fetch_page(self.request(*cursor)).await?;
        if deals.is_empty() {
            info!("Page {} came back empty, end of listing", cursor);
            return Err(DealError::EmptyPage { page: *cursor });
        }

        *cursor += 1;
        Ok(deals)
    }
}
