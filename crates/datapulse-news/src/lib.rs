//! News context analysis for datasets.
//!
//! Derives search keywords from a dataset, retrieves related news articles
//! from an RSS search backend, scores each article's sentiment with a
//! lexicon-based scorer, and classifies the results into impact cards.

pub mod error;
pub mod impact;
pub mod keywords;
pub mod pipeline;
pub mod scorer;
pub mod sources;
pub mod types;

mod retry;

pub use error::{NewsError, SentimentError};
pub use impact::{build_impacts, classify, LABEL_THRESHOLD};
pub use keywords::{extract_keywords, KeywordExtraction};
pub use pipeline::{analyze, NewsAnalyzer};
pub use scorer::{score_articles, Lexicon, SentimentAnalyzer};
pub use sources::{
    build_http_client, retrieve_articles, ArticleFetcher, HttpArticleFetcher, KeywordOutcome,
    Retrieval, RssSearchProvider, SearchProvider, MAX_KEYWORDS,
};
pub use types::{
    Article, FetchedArticle, ImpactRecord, LabelCounts, NewsConfig, PipelineStats, Report,
    ScoredArticle, SentimentLabel, SentimentScore,
};
