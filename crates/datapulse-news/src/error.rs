use thiserror::Error;

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("rate limited by {url}; retry after {retry_after_secs}s")]
    RateLimited { url: String, retry_after_secs: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("no search results for \"{query}\"")]
    NoResults { query: String },

    #[error("could not extract an article from {url}: {reason}")]
    Parse { url: String, reason: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("malformed sentiment for \"{title}\": {reason}")]
    MalformedSentiment { title: String, reason: String },
}

/// Failure to score one text. Callers substitute the neutral default.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SentimentError {
    #[error("text has no scorable tokens")]
    NoTokens,

    #[error("sentiment lexicon unavailable: {0}")]
    Lexicon(String),
}
