//! Sentiment label classification and impact cards.

use crate::error::NewsError;
use crate::types::{ImpactRecord, ScoredArticle, SentimentLabel};

/// Compound scores strictly above this are positive, strictly below its
/// negation are negative.
pub const LABEL_THRESHOLD: f64 = 0.2;

#[must_use]
pub fn classify(compound: f64) -> SentimentLabel {
    if compound > LABEL_THRESHOLD {
        SentimentLabel::Positive
    } else if compound < -LABEL_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

impl ImpactRecord {
    /// Build the impact card for a scored article.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError::MalformedSentiment`] when the compound score is
    /// not a finite number in `[-1.0, 1.0]`.
    pub fn from_scored(scored: &ScoredArticle) -> Result<Self, NewsError> {
        let compound = scored.sentiment.compound;
        if !compound.is_finite() || !(-1.0..=1.0).contains(&compound) {
            return Err(NewsError::MalformedSentiment {
                title: scored.article.title.clone(),
                reason: format!("compound score {compound} outside [-1, 1]"),
            });
        }
        Ok(Self {
            title: scored.article.title.clone(),
            summary: scored.article.summary.clone(),
            sentiment_label: classify(compound),
            confidence: compound.abs(),
            source: scored.article.source.clone(),
            url: scored.article.url.clone(),
        })
    }
}

/// Impact cards for every well-formed score, plus the number dropped.
#[must_use]
pub fn build_impacts(scored: &[ScoredArticle]) -> (Vec<ImpactRecord>, usize) {
    let mut impacts = Vec::with_capacity(scored.len());
    let mut dropped = 0;
    for item in scored {
        match ImpactRecord::from_scored(item) {
            Ok(record) => impacts.push(record),
            Err(e) => {
                dropped += 1;
                tracing::warn!(url = %item.article.url, error = %e, "dropping impact record");
            }
        }
    }
    (impacts, dropped)
}
