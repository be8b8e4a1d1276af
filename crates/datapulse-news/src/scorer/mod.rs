//! Rule-based sentiment scoring over a valence lexicon.
//!
//! Token valences are adjusted for booster words, ALL-CAPS emphasis,
//! nearby negation and "but" contrast, summed, amplified by `!`/`?`
//! emphasis and normalised into a compound score in `[-1.0, 1.0]`.

pub mod lexicon;

pub use lexicon::{builtin_lexicon, Lexicon};

use crate::error::SentimentError;
use crate::types::{Article, ScoredArticle, SentimentScore};

const BOOSTER_INCR: f64 = 0.293;
const BOOSTER_DECR: f64 = -0.293;
const CAPS_INCR: f64 = 0.733;
const NEGATION_SCALAR: f64 = -0.74;
const EXCLAMATION_INCR: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const QUESTION_INCR: f64 = 0.18;
const MAX_QUESTION_EMPHASIS: f64 = 0.96;
const NORMALIZATION_ALPHA: f64 = 15.0;
/// Booster influence by distance (1, 2, 3 tokens back).
const BOOSTER_DAMPING: [f64; 3] = [1.0, 0.95, 0.9];
const BEFORE_BUT: f64 = 0.5;
const AFTER_BUT: f64 = 1.5;

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "nowhere", "cannot",
    "without", "rarely", "seldom", "despite", "aint", "cant", "dont", "doesnt", "didnt",
    "isnt", "wasnt", "werent", "wont", "wouldnt", "shouldnt", "couldnt", "hasnt", "havent",
];

fn booster(word: &str) -> Option<f64> {
    match word {
        "absolutely" | "amazingly" | "awfully" | "completely" | "considerably" | "decidedly"
        | "deeply" | "enormously" | "entirely" | "especially" | "exceptionally" | "extremely"
        | "greatly" | "highly" | "hugely" | "incredibly" | "intensely" | "majorly" | "more"
        | "most" | "particularly" | "purely" | "quite" | "really" | "remarkably" | "so"
        | "substantially" | "thoroughly" | "totally" | "tremendously" | "truly" | "unbelievably"
        | "utterly" | "very" => Some(BOOSTER_INCR),
        "almost" | "barely" | "hardly" | "kinda" | "less" | "little" | "marginally"
        | "occasionally" | "partly" | "scarcely" | "slightly" | "somewhat" | "sorta" => {
            Some(BOOSTER_DECR)
        }
        _ => None,
    }
}

fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word) || word.ends_with("n't")
}

struct Token<'a> {
    raw: &'a str,
    lower: String,
}

impl Token<'_> {
    fn is_all_caps(&self) -> bool {
        self.raw.chars().any(char::is_alphabetic)
            && !self.raw.chars().any(char::is_lowercase)
    }
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    text.split_whitespace()
        .map(|word| word.trim_matches(|c: char| c.is_ascii_punctuation()))
        .filter(|word| word.chars().count() > 1)
        .map(|raw| Token {
            raw,
            lower: raw.to_lowercase(),
        })
        .collect()
}

/// Scores text with a valence lexicon.
///
/// Uses the shared built-in lexicon unless constructed with
/// [`SentimentAnalyzer::with_lexicon`].
#[derive(Debug, Clone, Default)]
pub struct SentimentAnalyzer {
    custom: Option<Lexicon>,
}

impl SentimentAnalyzer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_lexicon(lexicon: Lexicon) -> Self {
        Self {
            custom: Some(lexicon),
        }
    }

    fn lexicon(&self) -> Result<&Lexicon, SentimentError> {
        match &self.custom {
            Some(lexicon) => Ok(lexicon),
            None => builtin_lexicon(),
        }
    }

    /// Compound polarity plus positive/negative/neutral proportions.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::NoTokens`] for text without words and
    /// [`SentimentError::Lexicon`] if the lexicon is unavailable.
    pub fn polarity_scores(&self, text: &str) -> Result<SentimentScore, SentimentError> {
        let lexicon = self.lexicon()?;
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Err(SentimentError::NoTokens);
        }

        let with_letters = tokens
            .iter()
            .filter(|t| t.raw.chars().any(char::is_alphabetic))
            .count();
        let caps = tokens.iter().filter(|t| t.is_all_caps()).count();
        let mixed_case = caps > 0 && caps < with_letters;

        let mut valences: Vec<f64> = (0..tokens.len())
            .map(|i| token_valence(lexicon, &tokens, i, mixed_case))
            .collect();

        if let Some(but) = tokens.iter().position(|t| t.lower == "but") {
            for (i, valence) in valences.iter_mut().enumerate() {
                if i < but {
                    *valence *= BEFORE_BUT;
                } else if i > but {
                    *valence *= AFTER_BUT;
                }
            }
        }

        Ok(score_valences(&valences, punctuation_emphasis(text)))
    }

    /// Score every article. Failures are logged and replaced with the
    /// neutral default, so the output always matches the input length.
    #[must_use]
    pub fn score_articles(&self, articles: Vec<Article>) -> Vec<ScoredArticle> {
        articles
            .into_iter()
            .map(|article| match self.polarity_scores(&article.text) {
                Ok(sentiment) => ScoredArticle {
                    article,
                    sentiment,
                    defaulted: false,
                },
                Err(e) => {
                    tracing::warn!(
                        url = %article.url,
                        error = %e,
                        "sentiment scoring failed; using neutral default"
                    );
                    ScoredArticle {
                        article,
                        sentiment: SentimentScore::neutral(),
                        defaulted: true,
                    }
                }
            })
            .collect()
    }
}

/// Score articles with the built-in lexicon.
#[must_use]
pub fn score_articles(articles: Vec<Article>) -> Vec<ScoredArticle> {
    SentimentAnalyzer::new().score_articles(articles)
}

fn token_valence(lexicon: &Lexicon, tokens: &[Token<'_>], i: usize, mixed_case: bool) -> f64 {
    let token = &tokens[i];
    if booster(&token.lower).is_some() {
        return 0.0;
    }
    let Some(mut valence) = lexicon.valence(&token.lower) else {
        return 0.0;
    };
    if valence == 0.0 {
        return 0.0;
    }

    if mixed_case && token.is_all_caps() {
        valence += CAPS_INCR.copysign(valence);
    }

    for (distance, damping) in (1..=3).zip(BOOSTER_DAMPING) {
        let Some(prev) = i.checked_sub(distance).map(|j| &tokens[j]) else {
            break;
        };
        if let Some(base) = booster(&prev.lower) {
            let mut scalar = if valence < 0.0 { -base } else { base };
            if mixed_case && prev.is_all_caps() {
                scalar += CAPS_INCR.copysign(valence);
            }
            valence += scalar * damping;
        }
    }

    let negated = (1..=3).any(|distance| {
        i.checked_sub(distance)
            .is_some_and(|j| is_negation(&tokens[j].lower))
    });
    if negated {
        valence *= NEGATION_SCALAR;
    }
    valence
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
    #[allow(clippy::cast_precision_loss)]
    let exclamation = exclamations as f64 * EXCLAMATION_INCR;

    let questions = text.matches('?').count();
    #[allow(clippy::cast_precision_loss)]
    let question = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f64 * QUESTION_INCR,
        _ => MAX_QUESTION_EMPHASIS,
    };
    exclamation + question
}

fn score_valences(valences: &[f64], emphasis: f64) -> SentimentScore {
    let sum: f64 = valences.iter().sum();
    let compound = if sum == 0.0 {
        0.0
    } else {
        normalize(sum + emphasis.copysign(sum))
    };

    let mut positive_sum: f64 = valences.iter().filter(|v| **v > 0.0).map(|v| v + 1.0).sum();
    let mut negative_sum: f64 = valences.iter().filter(|v| **v < 0.0).map(|v| v - 1.0).sum();
    #[allow(clippy::cast_precision_loss)]
    let neutral_count = valences.iter().filter(|v| **v == 0.0).count() as f64;

    if positive_sum > negative_sum.abs() {
        positive_sum += emphasis;
    } else if positive_sum < negative_sum.abs() {
        negative_sum -= emphasis;
    }

    let total = positive_sum + negative_sum.abs() + neutral_count;
    SentimentScore {
        compound: round_to(compound, 4),
        positive: round_to(positive_sum / total, 3),
        negative: round_to(negative_sum.abs() / total, 3),
        neutral: round_to(neutral_count / total, 3),
    }
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
#[path = "scorer_test.rs"]
mod tests;
