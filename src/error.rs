use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Feed error: {0}")]
    Feed(String),

    #[error("LLM API error: {0}")]
    LLMApi(String),

    #[error("Bluesky API error: {0}")]
    Bluesky(String),

    #[error("Publish failed: {0}")]
    Publish(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, Error>;
