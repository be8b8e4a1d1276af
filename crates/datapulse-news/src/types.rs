use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use datapulse_core::{AppConfig, SearchBackend};
use serde::Serialize;

/// Settings for news retrieval and article fetching.
#[derive(Debug, Clone)]
pub struct NewsConfig {
    pub search_backend: SearchBackend,
    /// Origin override for the search endpoint; `None` uses the backend's public host.
    pub search_base_url: Option<String>,
    pub articles_per_keyword: usize,
    /// `0` disables the per-request timeout.
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub fetch_concurrency: usize,
    pub dedupe_urls: bool,
    pub user_agent: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            search_backend: SearchBackend::GoogleNews,
            search_base_url: None,
            articles_per_keyword: 3,
            request_timeout_secs: 30,
            max_retries: 0,
            retry_backoff_base_ms: 500,
            fetch_concurrency: 1,
            dedupe_urls: false,
            user_agent: "datapulse/0.1 (news-context)".to_string(),
        }
    }
}

impl NewsConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            search_backend: config.search_backend,
            search_base_url: config.search_base_url.clone(),
            articles_per_keyword: config.articles_per_keyword,
            request_timeout_secs: config.request_timeout_secs,
            max_retries: config.max_retries,
            retry_backoff_base_ms: config.retry_backoff_base_ms,
            fetch_concurrency: config.fetch_concurrency,
            dedupe_urls: config.dedupe_urls,
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Content extracted from one downloaded article page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedArticle {
    pub title: String,
    pub text: String,
    pub summary: String,
    pub keywords: BTreeSet<String>,
    pub published_date: Option<DateTime<Utc>>,
}

/// A retrieved news article.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    pub title: String,
    pub text: String,
    pub summary: String,
    pub keywords: BTreeSet<String>,
    pub url: String,
    pub published_date: Option<DateTime<Utc>>,
    /// Host name of the URL the article came from.
    pub source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentScore {
    /// Normalised overall polarity in `[-1.0, 1.0]`.
    pub compound: f64,
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl SentimentScore {
    /// The score substituted when an article cannot be scored.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            compound: 0.0,
            positive: 0.0,
            negative: 0.0,
            neutral: 1.0,
        }
    }
}

impl Default for SentimentScore {
    fn default() -> Self {
        Self::neutral()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredArticle {
    #[serde(flatten)]
    pub article: Article,
    pub sentiment: SentimentScore,
    /// `true` when scoring failed and `sentiment` is the neutral default.
    pub defaulted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "Positive"),
            SentimentLabel::Negative => write!(f, "Negative"),
            SentimentLabel::Neutral => write!(f, "Neutral"),
        }
    }
}

/// Display card for one classified article.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactRecord {
    pub title: String,
    pub summary: String,
    pub sentiment_label: SentimentLabel,
    /// Always `|compound|` of the article's score.
    pub confidence: f64,
    pub source: String,
    pub url: String,
}

/// Counts of every skip and substitution made during one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub keywords_extracted: usize,
    pub keywords_searched: usize,
    pub keywords_skipped: usize,
    pub urls_found: usize,
    pub urls_skipped: usize,
    pub duplicate_urls_dropped: usize,
    pub articles_fetched: usize,
    pub scores_defaulted: usize,
    pub impacts_dropped: usize,
    pub columns_skipped: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelCounts {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

/// Output of one news analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub news: Vec<ScoredArticle>,
    pub impacts: Vec<ImpactRecord>,
    pub keywords: Vec<String>,
    pub stats: PipelineStats,
}

impl Report {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn label_counts(&self) -> LabelCounts {
        let mut counts = LabelCounts::default();
        for impact in &self.impacts {
            match impact.sentiment_label {
                SentimentLabel::Positive => counts.positive += 1,
                SentimentLabel::Negative => counts.negative += 1,
                SentimentLabel::Neutral => counts.neutral += 1,
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impact(label: SentimentLabel) -> ImpactRecord {
        ImpactRecord {
            title: "t".to_string(),
            summary: String::new(),
            sentiment_label: label,
            confidence: 0.5,
            source: "example.com".to_string(),
            url: "https://example.com/a".to_string(),
        }
    }

    #[test]
    fn empty_report_has_no_content() {
        let report = Report::empty();
        assert!(report.news.is_empty());
        assert!(report.impacts.is_empty());
        assert!(report.keywords.is_empty());
        assert_eq!(report.stats, PipelineStats::default());
    }

    #[test]
    fn label_counts_tally_impacts() {
        let report = Report {
            impacts: vec![
                impact(SentimentLabel::Positive),
                impact(SentimentLabel::Negative),
                impact(SentimentLabel::Positive),
            ],
            ..Report::empty()
        };
        assert_eq!(
            report.label_counts(),
            LabelCounts {
                positive: 2,
                negative: 1,
                neutral: 0
            }
        );
    }

    #[test]
    fn neutral_score_is_the_default() {
        let score = SentimentScore::default();
        assert_eq!(score.compound, 0.0);
        assert_eq!(score.neutral, 1.0);
    }

    #[test]
    fn report_serializes_keys() {
        let json = serde_json::to_value(Report::empty()).expect("serializes");
        assert!(json.get("news").is_some());
        assert!(json.get("impacts").is_some());
        assert!(json.get("keywords").is_some());
    }
}
