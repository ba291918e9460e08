use thiserror::Error;

/// Crawler errors
#[derive(Error, Debug)]
pub enum CrawlerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid ignored-URL pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("HTTP status error: {0}")]
    HttpStatus(String),

    #[error("Content type error: {0}")]
    ContentType(String),

    #[error("Page parse error: {0}")]
    PageParse(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}
