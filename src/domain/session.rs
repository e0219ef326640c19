use super::{Deal, Query};

/// Everything the catalog remembers between user actions.
///
/// Lives only in memory and is owned by the catalog controller. `reset()`
/// is the only way back to the pristine state and runs on every initial load.
#[derive(Debug, Default)]
pub struct SessionState {
    /// Every deal fetched since the last reset, in arrival order. Never
    /// deduplicated.
    pub cache: Vec<Deal>,
    /// Last refinement of `cache`; recomputed on search or sort change.
    pub filtered: Vec<Deal>,
    /// Deals currently on screen, in card order.
    pub rendered: Vec<Deal>,
    /// Next page to request from the deals API.
    pub page_cursor: u32,
    pub query: Query,
    /// Deal shown in the detail overlay, if it is open.
    pub detail: Option<Deal>,
}

impl SessionState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn search_active(&self) -> bool {
        self.query.is_active()
    }

    pub fn detail_open(&self) -> bool {
        self.detail.is_some()
    }
}
