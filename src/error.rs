// src/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP error: {status} {url}")]
    Status { status: u16, url: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("No page loaded")]
    NoPage,

    #[error("Payload error: {0}")]
    Payload(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Browser error: {0}")]
    Browser(String),
}
