use crate::domain::{CardView, DetailView, Renderer};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Duration;
use tracing::warn;

const STRIKE_ON: &str = "\u{1b}[9m";
const STRIKE_OFF: &str = "\u{1b}[29m";

/// Renders the catalog as plain text cards on any writer.
///
/// The busy indicator is an `indicatif` spinner drawn on stderr; pass
/// `spinner = false` to keep it hidden (tests, piped output).
pub struct TerminalRenderer<W: Write> {
    out: W,
    plain: bool,
    spinner: bool,
    progress: Option<ProgressBar>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, plain: bool, spinner: bool) -> Self {
        Self {
            out,
            plain,
            spinner,
            progress: None,
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}").and_then(|_| self.out.flush()) {
            warn!("Failed to write to terminal: {}", e);
        }
    }

    fn strike(&self, text: &str) -> String {
        if self.plain {
            format!("~~{text}~~")
        } else {
            format!("{STRIKE_ON}{text}{STRIKE_OFF}")
        }
    }

    pub fn format_card(&self, card: &CardView) -> String {
        let mut price = String::from("precio:");
        if let Some(normal) = &card.normal_price {
            price.push(' ');
            price.push_str(&self.strike(&format!("${normal}")));
        }
        if let Some(sale) = &card.sale_price {
            price.push_str(&format!(" . ${sale}"));
        }
        if let Some(savings) = card.savings_percent {
            price.push_str(&format!(" . Ahorra {savings}%"));
        }

        let mut lines = vec![
            format!("[{}] {}", card.position, card.title),
            format!("    {price}"),
            format!("    ⭐ {}", card.rating),
        ];
        if !card.image_src.is_empty() {
            lines.push(format!("    imagen: {}", card.image_src));
        }
        if !card.description.is_empty() {
            lines.push(format!("    {}", card.description));
        }
        lines.join("\n")
    }

    pub fn format_detail(detail: &DetailView) -> String {
        [
            format!("┌─ {}", detail.title),
            format!("│ imagen: {} ({})", detail.image_src, detail.image_alt),
            format!("│ precio normal: {}", detail.normal_price),
            format!("│ precio oferta: {}", detail.sale_price),
            format!("│ ahorro: {}", detail.savings),
            format!("│ lanzamiento: {}", detail.release_date),
            format!("│ tienda: {}", detail.store_link),
            "└─ close: cerrar · overlay: clic en el fondo".to_string(),
        ]
        .join("\n")
    }
}

/// Output is append-only, so a shown error stays on screen until the next
/// message and `hide_error` has nothing to remove. There is no load-more
/// button either: the trigger state only changes the spinner text.
impl<W: Write> Renderer for TerminalRenderer<W> {
    fn show_loading(&mut self) {
        let progress = if self.spinner {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
                pb.set_style(style);
            }
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        } else {
            ProgressBar::hidden()
        };
        progress.set_message("Cargando...");
        self.progress = Some(progress);
    }

    fn hide_loading(&mut self) {
        if let Some(pb) = self.progress.take() {
            pb.finish_and_clear();
        }
    }

    fn show_error(&mut self, message: &str) {
        self.emit(&format!("! {message}"));
    }

    fn hide_error(&mut self) {}

    fn render_page(&mut self, cards: &[CardView], append: bool) {
        if !append && !cards.is_empty() {
            self.emit("── catálogo ──");
        }
        for card in cards {
            let text = self.format_card(card);
            self.emit(&text);
        }
    }

    fn show_detail(&mut self, detail: &DetailView) {
        self.emit(&Self::format_detail(detail));
    }

    fn hide_detail(&mut self) {
        self.emit("(detalle cerrado)");
    }

    fn set_load_more_enabled(&mut self, enabled: bool) {
        if let Some(pb) = &self.progress {
            pb.set_message(if enabled {
                "Cargando..."
            } else {
                "Cargando más juegos..."
            });
        }
    }
}
