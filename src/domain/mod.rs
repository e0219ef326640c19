mod deal;
mod query;
mod session;
pub(crate) mod source;
pub(crate) mod view;

pub use deal::Deal;
pub use query::{Query, SortKey};
pub use session::SessionState;
pub use source::{DealSource, PageRequest};
pub use view::{CardView, ClickTarget, DetailView, Renderer};
