use std::path::PathBuf;

/// News search backend queried for candidate article URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchBackend {
    GoogleNews,
    BingNews,
}

impl std::fmt::Display for SearchBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchBackend::GoogleNews => write!(f, "google_news"),
            SearchBackend::BingNews => write!(f, "bing_news"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub keyword_catalog_path: Option<PathBuf>,
    pub search_backend: SearchBackend,
    pub search_base_url: Option<String>,
    pub articles_per_keyword: usize,
    /// `0` disables the per-request timeout.
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub fetch_concurrency: usize,
    pub dedupe_urls: bool,
    pub user_agent: String,
    pub search_top_k: usize,
}
