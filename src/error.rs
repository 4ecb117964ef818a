use thiserror::Error;

#[derive(Error, Debug)]
pub enum LinkHarvesterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Missing configuration value: {name}")]
    MissingConfig { name: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Insert into '{table}' rejected with status {status}: {body}")]
    InsertRejected {
        table: String,
        status: u16,
        body: String,
    },

    #[error("Failed to crawl {url}: {message}")]
    FetchFailed { url: String, message: String },

    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, LinkHarvesterError>;
