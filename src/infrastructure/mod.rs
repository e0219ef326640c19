mod clients;
mod render;
mod storage;

pub use clients::cheapshark::{CheapSharkClient, DEFAULT_BASE_URL};
pub use render::terminal::TerminalRenderer;
pub use storage::fs_store::FileSystemStore;
