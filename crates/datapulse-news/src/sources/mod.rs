//! News search and article retrieval.

mod article;
mod rss;

pub use article::HttpArticleFetcher;
pub use rss::RssSearchProvider;

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use chrono::{Datelike, Utc};
use futures::StreamExt;

use crate::error::NewsError;
use crate::types::{Article, FetchedArticle, NewsConfig};

/// Only the first keywords of a keyword set are searched.
pub const MAX_KEYWORDS: usize = 5;

/// Returns candidate article URLs for a query, most relevant first.
pub trait SearchProvider {
    fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<String>, NewsError>> + Send;
}

/// Downloads and parses one article page.
pub trait ArticleFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedArticle, NewsError>> + Send;
}

/// Builds the HTTP client shared by the search provider and article fetcher.
///
/// A `request_timeout_secs` of `0` leaves requests without a timeout.
///
/// # Errors
///
/// Returns [`NewsError::Http`] if the underlying `reqwest::Client` cannot be constructed.
pub fn build_http_client(config: &NewsConfig) -> Result<reqwest::Client, NewsError> {
    let mut builder = reqwest::Client::builder().user_agent(&config.user_agent);
    if config.request_timeout_secs > 0 {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        builder = builder
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)));
    }
    Ok(builder.build()?)
}

#[must_use]
pub fn search_query(keyword: &str, year: i32) -> String {
    format!("{keyword} news {year}")
}

/// Host name of `url`, falling back to its third `/`-separated segment and
/// finally to the whole string.
#[must_use]
pub fn source_host(url: &str) -> String {
    if let Some(host) = reqwest::Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_owned))
    {
        return host;
    }
    url.split('/')
        .nth(2)
        .filter(|segment| !segment.is_empty())
        .unwrap_or(url)
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordOutcome {
    Searched {
        keyword: String,
        urls_found: usize,
        articles_fetched: usize,
    },
    Skipped {
        keyword: String,
        reason: String,
    },
}

/// Everything one retrieval pass produced, plus what it skipped.
#[derive(Debug, Clone, Default)]
pub struct Retrieval {
    pub articles: Vec<Article>,
    pub outcomes: Vec<KeywordOutcome>,
    pub urls_skipped: usize,
    pub duplicate_urls_dropped: usize,
}

impl Retrieval {
    #[must_use]
    pub fn keywords_searched(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, KeywordOutcome::Searched { .. }))
            .count()
    }

    #[must_use]
    pub fn keywords_skipped(&self) -> usize {
        self.outcomes.len() - self.keywords_searched()
    }

    #[must_use]
    pub fn urls_found(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o {
                KeywordOutcome::Searched { urls_found, .. } => *urls_found,
                KeywordOutcome::Skipped { .. } => 0,
            })
            .sum()
    }
}

/// Search the first [`MAX_KEYWORDS`] keywords and fetch up to
/// `articles_per_keyword` articles for each.
///
/// Continues past individual keyword and URL failures, logging warnings.
/// Returns an empty article list if everything fails.
pub async fn retrieve_articles<P, F>(
    provider: &P,
    fetcher: &F,
    keywords: &[String],
    config: &NewsConfig,
) -> Retrieval
where
    P: SearchProvider,
    F: ArticleFetcher,
{
    let year = Utc::now().year();
    let concurrency = config.fetch_concurrency.max(1);
    let mut retrieval = Retrieval::default();
    let mut seen_urls: HashSet<String> = HashSet::new();

    for keyword in keywords.iter().take(MAX_KEYWORDS) {
        let query = search_query(keyword, year);
        let mut urls = match provider.search(&query, config.articles_per_keyword).await {
            Ok(urls) => urls,
            Err(e) => {
                tracing::warn!(
                    keyword = %keyword,
                    error = %e,
                    "news search failed; skipping keyword"
                );
                retrieval.outcomes.push(KeywordOutcome::Skipped {
                    keyword: keyword.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        urls.truncate(config.articles_per_keyword);
        let urls_found = urls.len();

        if config.dedupe_urls {
            let before = urls.len();
            urls.retain(|url| seen_urls.insert(url.clone()));
            retrieval.duplicate_urls_dropped += before - urls.len();
        }

        let results: Vec<(String, Result<FetchedArticle, NewsError>)> =
            futures::stream::iter(urls.into_iter().map(|url| async move {
                let result = fetcher.fetch(&url).await;
                (url, result)
            }))
            .buffered(concurrency)
            .collect()
            .await;

        let mut articles_fetched = 0;
        for (url, result) in results {
            match result {
                Ok(fetched) => {
                    tracing::debug!(keyword = %keyword, url = %url, "fetched article");
                    articles_fetched += 1;
                    retrieval.articles.push(into_article(url, fetched));
                }
                Err(e) => {
                    tracing::warn!(
                        keyword = %keyword,
                        url = %url,
                        error = %e,
                        "article fetch failed; skipping url"
                    );
                    retrieval.urls_skipped += 1;
                }
            }
        }

        retrieval.outcomes.push(KeywordOutcome::Searched {
            keyword: keyword.clone(),
            urls_found,
            articles_fetched,
        });
    }

    tracing::info!(
        articles = retrieval.articles.len(),
        keywords_searched = retrieval.keywords_searched(),
        keywords_skipped = retrieval.keywords_skipped(),
        urls_skipped = retrieval.urls_skipped,
        "news retrieval finished"
    );

    retrieval
}

fn into_article(url: String, fetched: FetchedArticle) -> Article {
    Article {
        source: source_host(&url),
        title: fetched.title,
        text: fetched.text,
        summary: fetched.summary,
        keywords: fetched.keywords,
        published_date: fetched.published_date,
        url,
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
