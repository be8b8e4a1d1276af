//! Google News and Bing News RSS search.

use std::future::Future;

use datapulse_core::SearchBackend;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use quick_xml::events::Event;
use quick_xml::Reader;

use super::SearchProvider;
use crate::error::NewsError;
use crate::retry::retry_with_backoff;
use crate::types::NewsConfig;

const GOOGLE_NEWS_ORIGIN: &str = "https://news.google.com";
const BING_ORIGIN: &str = "https://www.bing.com";

/// Search provider backed by a news RSS feed.
///
/// Each `<item><link>` of the feed is one candidate article URL.
#[derive(Debug, Clone)]
pub struct RssSearchProvider {
    client: reqwest::Client,
    backend: SearchBackend,
    origin: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl RssSearchProvider {
    #[must_use]
    pub fn new(client: reqwest::Client, config: &NewsConfig) -> Self {
        let origin = config.search_base_url.clone().unwrap_or_else(|| {
            match config.search_backend {
                SearchBackend::GoogleNews => GOOGLE_NEWS_ORIGIN,
                SearchBackend::BingNews => BING_ORIGIN,
            }
            .to_string()
        });
        Self {
            client,
            backend: config.search_backend,
            origin,
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
        }
    }

    fn feed_url(&self, query: &str) -> String {
        let encoded = utf8_percent_encode(query, NON_ALPHANUMERIC).to_string();
        match self.backend {
            SearchBackend::GoogleNews => format!(
                "{}/rss/search?q={encoded}&hl=en-US&gl=US&ceid=US:en",
                self.origin
            ),
            SearchBackend::BingNews => {
                format!("{}/news/search?q={encoded}&format=rss", self.origin)
            }
        }
    }

    async fn search_feed(&self, query: &str, limit: usize) -> Result<Vec<String>, NewsError> {
        let url = self.feed_url(query);
        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self.client.get(&url).send().await?;
                let status = response.status();
                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(NewsError::RateLimited {
                        url,
                        retry_after_secs,
                    });
                }
                if !status.is_success() {
                    return Err(NewsError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }
                Ok(response.text().await?)
            }
        })
        .await?;

        let links = parse_feed_links(&body, limit)?;
        if links.is_empty() {
            return Err(NewsError::NoResults {
                query: query.to_string(),
            });
        }
        tracing::debug!(
            backend = %self.backend,
            query,
            count = links.len(),
            "search returned links"
        );
        Ok(links)
    }
}

impl SearchProvider for RssSearchProvider {
    fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<String>, NewsError>> + Send {
        self.search_feed(query, limit)
    }
}

/// Parse up to `limit` item links from an RSS feed body.
///
/// # Errors
///
/// Returns [`NewsError::Xml`] if the XML is malformed.
pub(crate) fn parse_feed_links(xml: &str, limit: usize) -> Result<Vec<String>, NewsError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut links = Vec::new();
    let mut in_item = false;
    let mut in_link = false;
    let mut current_link = String::new();

    loop {
        if links.len() >= limit {
            break;
        }
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"item" => {
                    in_item = true;
                    current_link.clear();
                }
                b"link" => in_link = in_item,
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"item" if in_item => {
                    in_item = false;
                    let link = unwrap_redirect(current_link.trim());
                    if !link.is_empty() {
                        links.push(link);
                    }
                }
                b"link" => in_link = false,
                _ => {}
            },
            Ok(Event::Text(e)) if in_link => {
                current_link = e.unescape().unwrap_or_default().into_owned();
            }
            Ok(Event::CData(e)) if in_link => {
                current_link = String::from_utf8_lossy(e.as_ref()).into_owned();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(NewsError::Xml(e)),
            _ => {}
        }
    }

    Ok(links)
}

/// Bing wraps result links in a click-tracking URL carrying the target in `url=`.
fn unwrap_redirect(link: &str) -> String {
    if !link.contains("apiclick.aspx") {
        return link.to_string();
    }
    reqwest::Url::parse(link)
        .ok()
        .and_then(|parsed| {
            parsed
                .query_pairs()
                .find(|(key, _)| key == "url")
                .map(|(_, value)| value.into_owned())
        })
        .unwrap_or_else(|| link.to_string())
}
