use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Advisor(String),

    #[error("Rate limited (HTTP {0})")]
    RateLimited(u16),

    #[error("API request failed with status: {0}")]
    HttpStatus(u16),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),
}

pub type Result<T> = std::result::Result<T, Error>;
