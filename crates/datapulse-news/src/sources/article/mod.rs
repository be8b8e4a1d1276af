//! HTTP article download and content extraction.

mod html;
mod nlp;

use std::future::Future;

use super::ArticleFetcher;
use crate::error::NewsError;
use crate::retry::retry_with_backoff;
use crate::types::{FetchedArticle, NewsConfig};

/// Downloads article pages and extracts title, body, date, keywords and summary.
#[derive(Debug, Clone)]
pub struct HttpArticleFetcher {
    client: reqwest::Client,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl HttpArticleFetcher {
    #[must_use]
    pub fn new(client: reqwest::Client, config: &NewsConfig) -> Self {
        Self {
            client,
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
        }
    }

    async fn download(&self, url: &str) -> Result<String, NewsError> {
        reqwest::Url::parse(url).map_err(|e| NewsError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
            let response = self
                .client
                .get(url)
                .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
                .send()
                .await?;
            let status = response.status();
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let retry_after_secs = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);
                return Err(NewsError::RateLimited {
                    url: url.to_string(),
                    retry_after_secs,
                });
            }
            if !status.is_success() {
                return Err(NewsError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }
            Ok(response.text().await?)
        })
        .await
    }

    async fn fetch_article(&self, url: &str) -> Result<FetchedArticle, NewsError> {
        let body = self.download(url).await?;
        parse_article(url, &body)
    }
}

impl ArticleFetcher for HttpArticleFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedArticle, NewsError>> + Send {
        self.fetch_article(url)
    }
}

/// Extract an article from a downloaded HTML page.
///
/// # Errors
///
/// Returns [`NewsError::Parse`] when the page has no paragraph text.
pub(crate) fn parse_article(url: &str, body: &str) -> Result<FetchedArticle, NewsError> {
    let page = html::extract_page(body);
    if page.paragraphs.is_empty() {
        return Err(NewsError::Parse {
            url: url.to_string(),
            reason: "no article text found".to_string(),
        });
    }

    let text = page.paragraphs.join("\n\n");
    Ok(FetchedArticle {
        keywords: nlp::extract_keywords(&page.title, &text, nlp::KEYWORD_COUNT),
        summary: nlp::summarize(&page.title, &text, nlp::SUMMARY_SENTENCES),
        title: page.title,
        published_date: page.published_date,
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_article() {
        let body = r#"<html><head><title>Chip stocks surge</title></head>
            <body><p>Chip stocks surged on strong demand.</p><p>Analysts expect chip demand to grow.</p></body></html>"#;
        let article = parse_article("https://example.com/a", body).expect("article");
        assert_eq!(article.title, "Chip stocks surge");
        assert!(article.text.contains("strong demand"));
        assert!(article.keywords.contains("chip"));
        assert!(!article.summary.is_empty());
    }

    #[test]
    fn page_without_paragraphs_is_a_parse_error() {
        let result = parse_article("https://example.com/a", "<html><title>Empty</title></html>");
        assert!(matches!(result, Err(NewsError::Parse { .. })));
    }
}
