//! Keyword and summary extraction for downloaded articles.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{L}[\p{L}\p{N}'-]*").expect("valid regex"));
static SENTENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^.!?]+(?:[.!?]+|$)").expect("valid regex"));

pub(crate) const KEYWORD_COUNT: usize = 10;
pub(crate) const SUMMARY_SENTENCES: usize = 5;

const TITLE_WEIGHT: f64 = 1.5;

static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
        "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
        "between", "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down",
        "during", "each", "few", "for", "from", "further", "had", "has", "have", "having", "he",
        "her", "here", "hers", "herself", "him", "himself", "his", "how", "i", "if", "in",
        "into", "is", "it", "it's", "its", "itself", "just", "me", "more", "most", "my",
        "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other",
        "our", "ours", "ourselves", "out", "over", "own", "said", "same", "says", "she",
        "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
        "themselves", "then", "there", "these", "they", "this", "those", "through", "to",
        "too", "under", "until", "up", "very", "was", "we", "were", "what", "when", "where",
        "which", "while", "who", "whom", "why", "will", "with", "would", "you", "your",
        "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

fn content_words(text: &str) -> Vec<String> {
    WORD_RE
        .find_iter(text)
        .map(|m| m.as_str().trim_matches(|c| c == '\'' || c == '-').to_lowercase())
        .filter(|w| w.chars().count() > 1 && !STOPWORDS.contains(w.as_str()))
        .collect()
}

/// Frequency of each content word, with ties broken by first appearance.
fn ranked_terms(text: &str) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (position, word) in content_words(text).into_iter().enumerate() {
        counts.entry(word).or_insert((0, position)).0 += 1;
    }
    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked
        .into_iter()
        .map(|(word, count, _)| (word, count))
        .collect()
}

/// The most frequent non-stop-words of the title and body.
pub(crate) fn extract_keywords(title: &str, text: &str, limit: usize) -> BTreeSet<String> {
    ranked_terms(&format!("{title} {text}"))
        .into_iter()
        .take(limit)
        .map(|(word, _)| word)
        .collect()
}

/// The best `limit` sentences of `text`, kept in document order.
///
/// A sentence scores by the share of title words it repeats plus the
/// average frequency weight of its content words.
pub(crate) fn summarize(title: &str, text: &str, limit: usize) -> String {
    let sentences: Vec<&str> = SENTENCE_RE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .collect();
    if sentences.len() <= limit {
        return sentences.join(" ");
    }

    let ranked = ranked_terms(text);
    #[allow(clippy::cast_precision_loss)]
    let max_count = ranked.first().map_or(1, |(_, count)| *count) as f64;
    #[allow(clippy::cast_precision_loss)]
    let weights: HashMap<&str, f64> = ranked
        .iter()
        .map(|(word, count)| (word.as_str(), *count as f64 / max_count))
        .collect();
    let title_words: HashSet<String> = content_words(title).into_iter().collect();

    let mut scored: Vec<(usize, f64)> = sentences
        .iter()
        .enumerate()
        .map(|(idx, sentence)| (idx, sentence_score(sentence, &title_words, &weights)))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(limit);
    scored.sort_by_key(|(idx, _)| *idx);

    scored
        .into_iter()
        .map(|(idx, _)| sentences[idx])
        .collect::<Vec<_>>()
        .join(" ")
}

fn sentence_score(
    sentence: &str,
    title_words: &HashSet<String>,
    weights: &HashMap<&str, f64>,
) -> f64 {
    let words = content_words(sentence);
    if words.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let title_overlap = if title_words.is_empty() {
        0.0
    } else {
        words.iter().filter(|w| title_words.contains(*w)).count() as f64 / title_words.len() as f64
    };
    #[allow(clippy::cast_precision_loss)]
    let density = words
        .iter()
        .map(|w| weights.get(w.as_str()).copied().unwrap_or(0.0))
        .sum::<f64>()
        / words.len() as f64;
    TITLE_WEIGHT * title_overlap + density
}
