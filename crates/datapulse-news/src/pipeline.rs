//! Keyword extraction → news retrieval → sentiment scoring → impact classification.

use std::panic::AssertUnwindSafe;

use datapulse_core::{Dataset, KeywordCatalog};
use futures::FutureExt;

use crate::error::NewsError;
use crate::impact::build_impacts;
use crate::keywords::extract_keywords;
use crate::scorer::SentimentAnalyzer;
use crate::sources::{
    build_http_client, retrieve_articles, ArticleFetcher, HttpArticleFetcher, RssSearchProvider,
    SearchProvider,
};
use crate::types::{NewsConfig, Report};

/// Runs the news analysis stages for a dataset.
pub struct NewsAnalyzer<P, F> {
    provider: P,
    fetcher: F,
    catalog: KeywordCatalog,
    config: NewsConfig,
    scorer: SentimentAnalyzer,
}

impl NewsAnalyzer<RssSearchProvider, HttpArticleFetcher> {
    /// Analyzer backed by the configured RSS search backend and HTTP article
    /// fetcher, sharing one HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError::Http`] if the HTTP client cannot be built.
    pub fn http(config: NewsConfig, catalog: KeywordCatalog) -> Result<Self, NewsError> {
        let client = build_http_client(&config)?;
        let provider = RssSearchProvider::new(client.clone(), &config);
        let fetcher = HttpArticleFetcher::new(client, &config);
        Ok(Self::new(provider, fetcher, catalog, config))
    }
}

impl<P, F> NewsAnalyzer<P, F>
where
    P: SearchProvider,
    F: ArticleFetcher,
{
    pub fn new(provider: P, fetcher: F, catalog: KeywordCatalog, config: NewsConfig) -> Self {
        Self {
            provider,
            fetcher,
            catalog,
            config,
            scorer: SentimentAnalyzer::new(),
        }
    }

    #[must_use]
    pub fn with_sentiment_analyzer(mut self, scorer: SentimentAnalyzer) -> Self {
        self.scorer = scorer;
        self
    }

    /// Analyze news relevant to `dataset`.
    ///
    /// Never fails: per-item problems are skipped and counted in the report
    /// stats, and a panicking stage yields [`Report::empty`].
    pub async fn analyze(&self, dataset: &Dataset) -> Report {
        match AssertUnwindSafe(self.run(dataset)).catch_unwind().await {
            Ok(report) => report,
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::error!(error = %message, "news analysis failed");
                Report::empty()
            }
        }
    }

    async fn run(&self, dataset: &Dataset) -> Report {
        let extraction = extract_keywords(dataset, &self.catalog);
        let mut report = Report {
            keywords: extraction.keywords,
            ..Report::empty()
        };
        report.stats.keywords_extracted = report.keywords.len();
        report.stats.columns_skipped = extraction.columns_skipped;

        if report.keywords.is_empty() {
            tracing::warn!("no keywords extracted from dataset");
            return report;
        }

        let retrieval =
            retrieve_articles(&self.provider, &self.fetcher, &report.keywords, &self.config).await;
        report.stats.keywords_searched = retrieval.keywords_searched();
        report.stats.keywords_skipped = retrieval.keywords_skipped();
        report.stats.urls_found = retrieval.urls_found();
        report.stats.urls_skipped = retrieval.urls_skipped;
        report.stats.duplicate_urls_dropped = retrieval.duplicate_urls_dropped;
        report.stats.articles_fetched = retrieval.articles.len();

        if retrieval.articles.is_empty() {
            tracing::warn!("no news articles found");
            return report;
        }

        let scored = self.scorer.score_articles(retrieval.articles);
        report.stats.scores_defaulted = scored.iter().filter(|s| s.defaulted).count();

        let (impacts, dropped) = build_impacts(&scored);
        report.stats.impacts_dropped = dropped;
        report.news = scored;
        report.impacts = impacts;

        let counts = report.label_counts();
        tracing::info!(
            articles = report.news.len(),
            positive = counts.positive,
            negative = counts.negative,
            neutral = counts.neutral,
            "news analysis finished"
        );
        report
    }
}

/// Analyze news for `dataset` over HTTP with the built-in keyword catalog.
///
/// A client construction failure is logged and yields [`Report::empty`].
pub async fn analyze(dataset: &Dataset, config: &NewsConfig) -> Report {
    match NewsAnalyzer::http(config.clone(), KeywordCatalog::default()) {
        Ok(analyzer) => analyzer.analyze(dataset).await,
        Err(e) => {
            tracing::error!(error = %e, "failed to build news HTTP client");
            Report::empty()
        }
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
