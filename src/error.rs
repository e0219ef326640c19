use thiserror::Error;

#[derive(Error, Debug)]
pub enum DealError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Response error: status {status}")]
    Response { status: reqwest::StatusCode },
    #[error("No deals on page {page}")]
    EmptyPage { page: u32 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DealError>;
