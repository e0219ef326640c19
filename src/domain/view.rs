use super::Deal;
use chrono::DateTime;

pub const NOT_AVAILABLE: &str = "No disponible";
pub const PLACEHOLDER_LINK: &str = "#";

pub const LOAD_FAILED: &str = "Error al cargar los juegos. Intenta más tarde.";
pub const LOAD_MORE_FAILED: &str = "Error al cargar más juegos. Intenta más tarde.";
pub const NO_MORE_DEALS: &str = "No hay más juegos disponibles";
pub const NO_MATCHES: &str = "No se encontraron videojuegos con ese criterio.";

/// Display unit for one deal in the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    /// 1-based position in the grid, used to open the detail overlay.
    pub position: usize,
    pub title: String,
    pub image_src: String,
    /// Crossed-out original price, without currency sign.
    pub normal_price: Option<String>,
    pub sale_price: Option<String>,
    pub savings_percent: Option<i64>,
    pub rating: String,
    pub description: String,
}

impl CardView {
    pub fn from_deal(position: usize, deal: &Deal) -> Self {
        Self {
            position,
            title: deal.display_title().to_string(),
            image_src: deal.image_src().to_string(),
            normal_price: deal.normal_price().map(str::to_string),
            sale_price: deal.sale_price().map(str::to_string),
            // a savings value that rounds down to 0 is hidden on cards
            savings_percent: deal.savings_percent().filter(|s| *s != 0),
            rating: deal.rating_label().to_string(),
            description: deal.description().to_string(),
        }
    }
}

/// Contents of the detail overlay for a single deal.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub title: String,
    pub image_src: String,
    pub image_alt: String,
    pub normal_price: String,
    pub sale_price: String,
    pub savings: String,
    pub release_date: String,
    pub store_link: String,
}

impl DetailView {
    pub fn from_deal(deal: &Deal, redirect_base: &str) -> Self {
        let title = deal.display_title().to_string();
        let release_date = deal
            .steam_release_date
            .filter(|ts| *ts > 0.0)
            .and_then(|ts| DateTime::from_timestamp(ts as i64, 0))
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        Self {
            image_src: deal.image_src().to_string(),
            image_alt: title.clone(),
            title,
            normal_price: price_or_unavailable(deal.normal_price()),
            sale_price: price_or_unavailable(deal.sale_price()),
            savings: deal
                .savings_percent()
                .map(|s| format!("{s}%"))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            release_date,
            store_link: store_link(deal, redirect_base)
                .unwrap_or_else(|| PLACEHOLDER_LINK.to_string()),
        }
    }
}

/// Storefront redirect for a deal, only when it carries a game id.
pub fn store_link(deal: &Deal, redirect_base: &str) -> Option<String> {
    deal.game_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .map(|id| {
            format!(
                "{}/api/redirect/steam?appID={id}",
                redirect_base.trim_end_matches('/')
            )
        })
}

fn price_or_unavailable(price: Option<&str>) -> String {
    price
        .map(|p| format!("${p}"))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Where a click on the detail overlay landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The overlay root itself, i.e. the dimmed background.
    Overlay,
    /// Anything inside the content panel.
    Content,
}

/// Output side of the catalog. Implementations own all presentation; the
/// catalog controller only decides what to show.
pub trait Renderer {
    fn show_loading(&mut self);
    fn hide_loading(&mut self);
    fn show_error(&mut self, message: &str);
    fn hide_error(&mut self);
    /// Emits one card per entry, in order. Without `append` the previous
    /// cards are cleared first.
    fn render_page(&mut self, cards: &[CardView], append: bool);
    fn show_detail(&mut self, detail: &DetailView);
    fn hide_detail(&mut self);
    fn set_load_more_enabled(&mut self, enabled: bool);
}
