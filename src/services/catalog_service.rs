use crate::domain::view::{LOAD_FAILED, LOAD_MORE_FAILED, NO_MATCHES, NO_MORE_DEALS};
use crate::domain::{
    CardView, ClickTarget, Deal, DealSource, DetailView, PageRequest, Query, Renderer,
    SessionState, SortKey,
};
use crate::error::{DealError, Result};
use crate::infrastructure::FileSystemStore;
use crate::services::pagination::Paginator;
use crate::services::refine::refine;
use tracing::{debug, error, info, warn};

/// How the first batch of deals is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStrategy {
    /// Fetch `size` deals up front so local search has more to work with,
    /// but only render the first page of them.
    Prefetch { size: u32 },
    /// Fetch exactly one page.
    PerPage,
}

#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub store_id: u32,
    pub page_size: u32,
    pub strategy: LoadStrategy,
    /// Host used to build storefront redirect links.
    pub redirect_base: String,
}

/// Drives the catalog: owns the session state, talks to the deal source and
/// tells the renderer what to show. Every user action handles its own
/// failures; nothing here returns an error to the caller.
pub struct CatalogService<S, R> {
    source: S,
    renderer: R,
    paginator: Paginator,
    strategy: LoadStrategy,
    redirect_base: String,
    fallback: Option<FileSystemStore>,
    state: SessionState,
}

impl<S, R> CatalogService<S, R>
where
    S: DealSource,
    R: Renderer,
{
    pub fn new(source: S, renderer: R, settings: CatalogSettings) -> Self {
        Self {
            source,
            renderer,
            paginator: Paginator::new(settings.store_id, settings.page_size),
            strategy: settings.strategy,
            redirect_base: settings.redirect_base,
            fallback: None,
            state: SessionState::default(),
        }
    }

    pub fn with_fallback(mut self, store: FileSystemStore) -> Self {
        self.fallback = Some(store);
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[cfg(test)]
    fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Starts over: clears the session, fetches the first batch and renders
    /// the first page of it.
    pub async fn initial_load(&mut self) {
        self.load(None).await;
    }

    /// Starts over like `initial_load`, but renders only the deals matching
    /// `query` instead of the first page.
    pub async fn load_refined(&mut self, query: Query) {
        self.load(Some(query)).await;
    }

    async fn load(&mut self, query: Option<Query>) {
        self.renderer.show_loading();
        self.renderer.hide_error();
        self.state.reset();
        self.render(Vec::new(), false);

        match self.fetch_initial().await {
            Ok(deals) => self.populate(deals, query),
            Err(e) => {
                error!("Failed to load deals: {}", e);
                match self.load_fallback() {
                    Some(deals) => {
                        warn!("Deals API unavailable, showing {} local deals", deals.len());
                        self.populate(deals, query);
                    }
                    None => self.renderer.show_error(LOAD_FAILED),
                }
            }
        }

        self.renderer.hide_loading();
    }

    /// Filters the full cache by `term` with the active sort key and replaces
    /// the rendered cards with the result.
    pub fn search(&mut self, term: &str) {
        self.state.query.term = term.to_string();
        self.apply_query();
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.state.query.sort = sort;
        self.apply_query();
    }

    /// Replaces term and sort key together with a single refinement pass.
    pub fn set_query(&mut self, query: Query) {
        self.state.query = query;
        self.apply_query();
    }

    /// Fetches the next page and appends it. Ignores the active search: new
    /// deals go into the cache and onto the grid unfiltered.
    pub async fn load_more(&mut self) {
        self.renderer.show_loading();
        self.renderer.hide_error();
        self.renderer.set_load_more_enabled(false);

        match self
            .paginator
            .advance(&self.source, &mut self.state.page_cursor)
            .await
        {
            Ok(deals) => {
                self.state.cache.extend(deals.iter().cloned());
                self.render(deals, true);
            }
            Err(DealError::EmptyPage { page }) => {
                info!("No more deals after page {}", page);
                self.renderer.show_error(NO_MORE_DEALS);
            }
            Err(e) => {
                error!("Failed to load more deals: {}", e);
                self.renderer.show_error(LOAD_MORE_FAILED);
            }
        }

        self.renderer.set_load_more_enabled(true);
        self.renderer.hide_loading();
    }

    /// Opens the detail overlay for the card at a 1-based grid position.
    /// Returns false when there is no such card.
    pub fn open_detail(&mut self, position: usize) -> bool {
        let deal = position
            .checked_sub(1)
            .and_then(|index| self.state.rendered.get(index))
            .cloned();

        match deal {
            Some(deal) => {
                self.show_detail(deal);
                true
            }
            None => {
                warn!("No card at position {}", position);
                false
            }
        }
    }

    pub fn show_detail(&mut self, deal: Deal) {
        let view = DetailView::from_deal(&deal, &self.redirect_base);
        debug!("Opening detail for {}", view.title);
        self.state.detail = Some(deal);
        self.renderer.show_detail(&view);
    }

    pub fn close_detail(&mut self) {
        if self.state.detail.take().is_some() {
            self.renderer.hide_detail();
        }
    }

    /// Only a click on the overlay root closes the detail; clicks inside the
    /// content panel do nothing.
    pub fn overlay_click(&mut self, target: ClickTarget) {
        if target == ClickTarget::Overlay {
            self.close_detail();
        }
    }

    async fn fetch_initial(&self) -> Result<Vec<Deal>> {
        let request = match self.strategy {
            LoadStrategy::Prefetch { size } => PageRequest {
                page_size: size,
                ..self.paginator.request(0)
            },
            LoadStrategy::PerPage => self.paginator.request(0),
        };
        self.source.fetch_page(request).await
    }

    fn load_fallback(&self) -> Option<Vec<Deal>> {
        let store = self.fallback.as_ref()?;
        match store.load_fallback_deals() {
            Ok(deals) => deals,
            Err(e) => {
                error!("Failed to read fallback deals: {}", e);
                None
            }
        }
    }

    fn populate(&mut self, deals: Vec<Deal>, query: Option<Query>) {
        info!("Cached {} deals", deals.len());
        self.state.filtered = deals.clone();
        self.state.cache = deals;
        self.state.page_cursor += 1;

        match query {
            Some(query) => {
                self.state.query = query;
                self.refresh_view();
            }
            None => {
                let first_page: Vec<Deal> = self
                    .state
                    .cache
                    .iter()
                    .take(self.paginator.page_size() as usize)
                    .cloned()
                    .collect();
                self.render(first_page, false);
            }
        }
    }

    fn apply_query(&mut self) {
        self.renderer.show_loading();
        self.refresh_view();
        self.renderer.hide_loading();
    }

    fn refresh_view(&mut self) {
        let results = refine(&self.state.cache, &self.state.query);
        debug!(
            "Search '{}' sorted by {} matched {} of {} deals",
            self.state.query.term,
            self.state.query.sort,
            results.len(),
            self.state.cache.len()
        );
        self.state.filtered = results.clone();

        if results.is_empty() {
            self.render(Vec::new(), false);
            self.renderer.show_error(NO_MATCHES);
        } else {
            self.renderer.hide_error();
            self.render(results, false);
        }
    }

    fn render(&mut self, deals: Vec<Deal>, append: bool) {
        if !append {
            self.state.rendered.clear();
        }
        let offset = self.state.rendered.len();
        let cards: Vec<CardView> = deals
            .iter()
            .enumerate()
            .map(|(i, deal)| CardView::from_deal(offset + i + 1, deal))
            .collect();

        self.state.rendered.extend(deals);
        self.renderer.render_page(&cards, append);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    enum Reply {
        Deals(Vec<Deal>),
        Status(StatusCode),
    }

    #[derive(Default)]
    struct ScriptedSource {
        replies: Mutex<VecDeque<Reply>>,
        requests: Mutex<Vec<PageRequest>>,
    }

    impl ScriptedSource {
        fn new(replies: Vec<Reply>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::default(),
            }
        }

        fn requests(&self) -> Vec<PageRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DealSource for ScriptedSource {
        async fn fetch_page(&self, request: PageRequest) -> Result<Vec<Deal>> {
            self.requests.lock().unwrap().push(request);
            match self.replies.lock().unwrap().pop_front() {
                Some(Reply::Deals(deals)) => Ok(deals),
                Some(Reply::Status(status)) => Err(DealError::Response { status }),
                None => Ok(Vec::new()),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Loading,
        Loaded,
        Error(String),
        HideError,
        Page { titles: Vec<String>, append: bool },
        Detail(DetailView),
        HideDetail,
        LoadMore(bool),
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<Event>,
    }

    impl Recorder {
        fn errors(&self) -> Vec<&str> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Error(m) => Some(m.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn last_page(&self) -> Option<(&[String], bool)> {
            self.events.iter().rev().find_map(|e| match e {
                Event::Page { titles, append } => Some((titles.as_slice(), *append)),
                _ => None,
            })
        }
    }

    impl Renderer for Recorder {
        fn show_loading(&mut self) {
            self.events.push(Event::Loading);
        }
        fn hide_loading(&mut self) {
            self.events.push(Event::Loaded);
        }
        fn show_error(&mut self, message: &str) {
            self.events.push(Event::Error(message.to_string()));
        }
        fn hide_error(&mut self) {
            self.events.push(Event::HideError);
        }
        fn render_page(&mut self, cards: &[CardView], append: bool) {
            self.events.push(Event::Page {
                titles: cards.iter().map(|c| c.title.clone()).collect(),
                append,
            });
        }
        fn show_detail(&mut self, detail: &DetailView) {
            self.events.push(Event::Detail(detail.clone()));
        }
        fn hide_detail(&mut self) {
            self.events.push(Event::HideDetail);
        }
        fn set_load_more_enabled(&mut self, enabled: bool) {
            self.events.push(Event::LoadMore(enabled));
        }
    }

    fn deals(prefix: &str, count: usize) -> Vec<Deal> {
        (0..count)
            .map(|i| Deal::titled(format!("{prefix} {i}")))
            .collect()
    }

    fn settings(strategy: LoadStrategy) -> CatalogSettings {
        CatalogSettings {
            store_id: 1,
            page_size: 12,
            strategy,
            redirect_base: "https://www.cheapshark.com".to_string(),
        }
    }

    fn catalog(
        replies: Vec<Reply>,
        strategy: LoadStrategy,
    ) -> CatalogService<ScriptedSource, Recorder> {
        CatalogService::new(
            ScriptedSource::new(replies),
            Recorder::default(),
            settings(strategy),
        )
    }

    const PREFETCH: LoadStrategy = LoadStrategy::Prefetch { size: 60 };

    #[tokio::test]
    async fn prefetch_caches_everything_but_renders_one_page() {
        let mut catalog = catalog(vec![Reply::Deals(deals("Deal", 30))], PREFETCH);

        catalog.initial_load().await;

        let state = catalog.state();
        assert_eq!(state.cache.len(), 30);
        assert_eq!(state.filtered.len(), 30);
        assert_eq!(state.rendered.len(), 12);
        assert_eq!(state.page_cursor, 1);

        let requests = catalog.source.requests();
        assert_eq!(
            requests,
            vec![PageRequest {
                store_id: 1,
                page_size: 60,
                page_number: 0
            }]
        );

        let events = &catalog.renderer().events;
        assert_eq!(events.first(), Some(&Event::Loading));
        assert_eq!(events.last(), Some(&Event::Loaded));
        let (titles, append) = catalog.renderer().last_page().unwrap();
        assert_eq!(titles.len(), 12);
        assert_eq!(titles[0], "Deal 0");
        assert!(!append);
    }

    #[tokio::test]
    async fn per_page_strategy_fetches_a_single_page() {
        let mut catalog = catalog(vec![Reply::Deals(deals("Deal", 12))], LoadStrategy::PerPage);

        catalog.initial_load().await;

        assert_eq!(catalog.source.requests()[0].page_size, 12);
        assert_eq!(catalog.state().rendered.len(), 12);
        assert_eq!(catalog.state().page_cursor, 1);
    }

    #[tokio::test]
    async fn failed_initial_load_shows_error_and_keeps_cache_empty() {
        let mut catalog = catalog(
            vec![Reply::Status(StatusCode::INTERNAL_SERVER_ERROR)],
            PREFETCH,
        );

        catalog.initial_load().await;

        assert!(catalog.state().cache.is_empty());
        assert_eq!(catalog.state().page_cursor, 0);
        assert_eq!(catalog.renderer().errors(), vec![LOAD_FAILED]);
        assert_eq!(catalog.renderer().events.last(), Some(&Event::Loaded));
    }

    #[tokio::test]
    async fn failed_initial_load_uses_fallback_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deals.json");
        std::fs::write(&path, r#"[{"title":"Portal 2"},{"title":"Braid"}]"#).unwrap();

        let mut catalog = catalog(
            vec![Reply::Status(StatusCode::BAD_GATEWAY)],
            PREFETCH,
        )
        .with_fallback(FileSystemStore::new(&path));

        catalog.initial_load().await;

        assert_eq!(catalog.state().cache.len(), 2);
        assert_eq!(catalog.state().rendered.len(), 2);
        assert!(catalog.renderer().errors().is_empty());
    }

    #[tokio::test]
    async fn load_more_appends_next_page() {
        let mut catalog = catalog(
            vec![
                Reply::Deals(deals("First", 12)),
                Reply::Deals(deals("Second", 12)),
            ],
            LoadStrategy::PerPage,
        );
        catalog.initial_load().await;

        catalog.load_more().await;

        let state = catalog.state();
        assert_eq!(state.page_cursor, 2);
        assert_eq!(state.cache.len(), 24);
        assert_eq!(state.rendered.len(), 24);
        assert_eq!(catalog.source.requests()[1].page_number, 1);

        let (titles, append) = catalog.renderer().last_page().unwrap();
        assert!(append);
        assert_eq!(titles[0], "Second 0");

        let toggles: Vec<&Event> = catalog
            .renderer()
            .events
            .iter()
            .filter(|e| matches!(e, Event::LoadMore(_)))
            .collect();
        assert_eq!(toggles, vec![&Event::LoadMore(false), &Event::LoadMore(true)]);
    }

    #[tokio::test]
    async fn empty_page_keeps_cursor_and_cards() {
        let mut catalog = catalog(
            vec![Reply::Deals(deals("Deal", 12)), Reply::Deals(Vec::new())],
            LoadStrategy::PerPage,
        );
        catalog.initial_load().await;
        let rendered_before = catalog.state().rendered.clone();

        catalog.load_more().await;

        assert_eq!(catalog.state().page_cursor, 1);
        assert_eq!(catalog.state().rendered, rendered_before);
        assert_eq!(catalog.renderer().errors(), vec![NO_MORE_DEALS]);
        assert_eq!(catalog.renderer().events.last(), Some(&Event::Loaded));
    }

    #[tokio::test]
    async fn failed_load_more_leaves_cache_alone() {
        let mut catalog = catalog(
            vec![
                Reply::Deals(deals("Deal", 12)),
                Reply::Status(StatusCode::SERVICE_UNAVAILABLE),
            ],
            LoadStrategy::PerPage,
        );
        catalog.initial_load().await;
        let cache_before = catalog.state().cache.clone();

        catalog.load_more().await;

        assert_eq!(catalog.state().cache, cache_before);
        assert_eq!(catalog.state().page_cursor, 1);
        assert_eq!(catalog.renderer().errors(), vec![LOAD_MORE_FAILED]);
        assert!(catalog
            .renderer()
            .events
            .ends_with(&[Event::LoadMore(true), Event::Loaded]));
    }

    #[tokio::test]
    async fn search_filters_full_cache_and_replaces_cards() {
        let mut cache = deals("Filler", 20);
        cache.push(Deal::titled("God of War"));
        cache.push(Deal::titled("Horizon"));
        let mut catalog = catalog(vec![Reply::Deals(cache)], PREFETCH);
        catalog.initial_load().await;

        catalog.search("god");

        assert_eq!(catalog.state().filtered, vec![Deal::titled("God of War")]);
        assert_eq!(catalog.state().rendered.len(), 1);
        let (titles, append) = catalog.renderer().last_page().unwrap();
        assert_eq!(titles, ["God of War".to_string()]);
        assert!(!append);
        assert!(catalog.state().search_active());

        catalog.search("");
        assert_eq!(catalog.state().rendered.len(), 22);
    }

    #[tokio::test]
    async fn search_without_matches_clears_grid_and_says_so() {
        let mut catalog = catalog(vec![Reply::Deals(deals("Deal", 5))], PREFETCH);
        catalog.initial_load().await;

        catalog.search("zzz");

        assert!(catalog.state().rendered.is_empty());
        assert_eq!(catalog.renderer().errors(), vec![NO_MATCHES]);
        assert_eq!(catalog.state().cache.len(), 5);
    }

    #[tokio::test]
    async fn sort_change_reorders_the_filtered_view() {
        let replies = vec![Reply::Deals(vec![
            Deal::titled("Zelda"),
            Deal::titled("Alan Wake"),
        ])];
        let mut catalog = catalog(replies, PREFETCH);
        catalog.initial_load().await;

        catalog.set_sort(SortKey::Name);

        let (titles, _) = catalog.renderer().last_page().unwrap();
        assert_eq!(titles, ["Alan Wake".to_string(), "Zelda".to_string()]);
        assert_eq!(catalog.state().cache[0], Deal::titled("Zelda"));

        catalog.set_query(Query::new("zel", SortKey::None));
        let (titles, _) = catalog.renderer().last_page().unwrap();
        assert_eq!(titles, ["Zelda".to_string()]);
        assert_eq!(catalog.state().query.sort, SortKey::None);
    }

    #[tokio::test]
    async fn load_more_ignores_active_search() {
        let mut catalog = catalog(
            vec![
                Reply::Deals(vec![Deal::titled("God of War"), Deal::titled("Horizon")]),
                Reply::Deals(vec![Deal::titled("Halo")]),
            ],
            LoadStrategy::PerPage,
        );
        catalog.initial_load().await;
        catalog.search("god");

        catalog.load_more().await;

        let titles: Vec<&str> = catalog
            .state()
            .rendered
            .iter()
            .map(|d| d.display_title())
            .collect();
        assert_eq!(titles, vec!["God of War", "Halo"]);
        assert_eq!(catalog.state().cache.len(), 3);
    }

    #[tokio::test]
    async fn detail_opens_and_closes() {
        let deal = Deal {
            game_id: Some("1145360".to_string()),
            ..Deal::titled("Hades")
        };
        let mut catalog = catalog(vec![Reply::Deals(vec![deal.clone()])], PREFETCH);
        catalog.initial_load().await;

        assert!(!catalog.open_detail(0));
        assert!(!catalog.open_detail(2));
        assert!(catalog.open_detail(1));
        assert_eq!(catalog.state().detail, Some(deal));
        match catalog.renderer().events.last() {
            Some(Event::Detail(view)) => assert_eq!(
                view.store_link,
                "https://www.cheapshark.com/api/redirect/steam?appID=1145360"
            ),
            other => panic!("expected detail, got {other:?}"),
        }

        catalog.overlay_click(ClickTarget::Content);
        assert!(catalog.state().detail_open());

        catalog.overlay_click(ClickTarget::Overlay);
        assert!(!catalog.state().detail_open());
        assert_eq!(catalog.renderer().events.last(), Some(&Event::HideDetail));

        catalog.show_detail(Deal::titled("Braid"));
        catalog.close_detail();
        assert!(!catalog.state().detail_open());
    }

    #[tokio::test]
    async fn refined_load_renders_only_matches() {
        let mut cache = deals("Filler", 20);
        cache.push(Deal::titled("God of War"));
        let mut catalog = catalog(vec![Reply::Deals(cache)], PREFETCH);

        catalog
            .load_refined(Query::new("god", SortKey::Name))
            .await;

        let filled: Vec<&Event> = catalog
            .renderer()
            .events
            .iter()
            .filter(|e| matches!(e, Event::Page { titles, .. } if !titles.is_empty()))
            .collect();
        assert_eq!(
            filled,
            vec![&Event::Page {
                titles: vec!["God of War".to_string()],
                append: false
            }]
        );

        let state = catalog.state();
        assert_eq!(state.cache.len(), 21);
        assert_eq!(state.page_cursor, 1);
        assert_eq!(state.query, Query::new("god", SortKey::Name));

        let events = &catalog.renderer().events;
        assert_eq!(events.iter().filter(|e| **e == Event::Loading).count(), 1);
        assert_eq!(events.last(), Some(&Event::Loaded));
    }

    #[tokio::test]
    async fn reload_resets_session() {
        let mut catalog = catalog(
            vec![
                Reply::Deals(deals("First", 12)),
                Reply::Deals(deals("Second", 12)),
                Reply::Deals(deals("Fresh", 3)),
            ],
            LoadStrategy::PerPage,
        );
        catalog.initial_load().await;
        catalog.load_more().await;
        catalog.search("first");
        assert_eq!(catalog.state().page_cursor, 2);

        catalog.initial_load().await;

        let state = catalog.state();
        assert_eq!(state.page_cursor, 1);
        assert_eq!(state.cache.len(), 3);
        assert!(!state.search_active());
        assert_eq!(catalog.source.requests()[2].page_number, 0);
    }
}
