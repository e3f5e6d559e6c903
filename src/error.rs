use thiserror::Error;

/// Failures talking to the release source. Always transient from the
/// worker's point of view: the cycle is dropped and retried later.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

#[derive(Debug, Error)]
#[error("markdown render failed: {0}")]
pub struct RenderError(pub String);

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Failed to serialize feed: {0}")]
    Serialize(#[from] std::fmt::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no languages configured")]
    NoLanguages,

    #[error("empty language name in language list")]
    EmptyLanguage,

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
}
