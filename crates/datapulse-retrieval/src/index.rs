//! TF-IDF term-weight index with cosine ranking.
//!
//! Weights are corpus-relative, so the index is always built from the full
//! document set in one pass; there is no incremental insert.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::tokenizer::tokenize;

/// Sparse term-weight vector, sorted by term index and L2-normalised.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    entries: Vec<(usize, f64)>,
}

impl TermVector {
    fn from_counts(counts: HashMap<usize, usize>, idf: &[f64]) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(term, tf)| (term, tf as f64 * idf[term]))
            .collect();
        entries.sort_unstable_by_key(|&(term, _)| term);

        let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut entries {
                *w /= norm;
            }
        }
        Self { entries }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Weight for a term index, `0.0` when absent.
    #[must_use]
    pub fn weight(&self, term: usize) -> f64 {
        self.entries
            .binary_search_by_key(&term, |&(t, _)| t)
            .map_or(0.0, |pos| self.entries[pos].1)
    }

    /// Cosine similarity. Both vectors are unit length, so this is the dot product.
    #[must_use]
    pub fn cosine(&self, other: &TermVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut dot = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (ti, wi) = self.entries[i];
            let (tj, wj) = other.entries[j];
            match ti.cmp(&tj) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    dot += wi * wj;
                    i += 1;
                    j += 1;
                }
            }
        }
        dot
    }
}

#[derive(Debug, Clone)]
struct IndexedDocument {
    id: String,
    text: String,
    vector: TermVector,
}

/// One ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit<'a> {
    pub id: &'a str,
    pub text: &'a str,
    pub score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct LexicalIndex {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    documents: Vec<IndexedDocument>,
}

impl LexicalIndex {
    /// Build the index over every `(id, text)` pair, in insertion order.
    ///
    /// Vocabulary indices follow sorted term order so repeated builds over the
    /// same documents are identical. Term weight is raw term frequency times
    /// smoothed inverse document frequency, `ln((1 + n) / (1 + df)) + 1`.
    pub fn build<I, K, V>(documents: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let raw: Vec<(String, String, Vec<String>)> = documents
            .into_iter()
            .map(|(id, text)| {
                let text = text.into();
                let tokens = tokenize(&text);
                (id.into(), text, tokens)
            })
            .collect();

        let terms: BTreeSet<&str> = raw
            .iter()
            .flat_map(|(_, _, tokens)| tokens.iter().map(String::as_str))
            .collect();
        let vocabulary: HashMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term.to_string(), idx))
            .collect();

        let mut doc_freq = vec![0usize; vocabulary.len()];
        for (_, _, tokens) in &raw {
            let unique: BTreeSet<usize> = tokens.iter().map(|t| vocabulary[t]).collect();
            for term in unique {
                doc_freq[term] += 1;
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let n = raw.len() as f64;
        #[allow(clippy::cast_precision_loss)]
        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let documents = raw
            .into_iter()
            .map(|(id, text, tokens)| {
                let counts = count_terms(&tokens, &vocabulary);
                let vector = TermVector::from_counts(counts, &idf);
                IndexedDocument { id, text, vector }
            })
            .collect();

        Self {
            vocabulary,
            idf,
            documents,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Embed text into the index's vocabulary space.
    ///
    /// Terms the index has never seen contribute nothing; the index itself is
    /// left untouched.
    #[must_use]
    pub fn embed(&self, text: &str) -> TermVector {
        let counts = count_terms(&tokenize(text), &self.vocabulary);
        TermVector::from_counts(counts, &self.idf)
    }

    /// Rank every document against `query` and return the best `k`.
    ///
    /// Results are ordered by descending cosine similarity; equal scores keep
    /// insertion order. Documents with zero similarity are still eligible, so
    /// up to `k` hits come back whenever the index is non-empty.
    #[must_use]
    pub fn search(&self, query: &str, k: usize) -> Vec<SearchHit<'_>> {
        if self.documents.is_empty() || k == 0 {
            return Vec::new();
        }

        let query_vector = self.embed(query);
        let mut hits: Vec<SearchHit<'_>> = self
            .documents
            .iter()
            .map(|doc| SearchHit {
                id: &doc.id,
                text: &doc.text,
                score: query_vector.cosine(&doc.vector),
            })
            .collect();

        // Stable sort: ties stay in insertion order.
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(k);
        hits
    }

    /// Texts of the best `k` documents for `query`.
    #[must_use]
    pub fn search_texts(&self, query: &str, k: usize) -> Vec<String> {
        self.search(query, k)
            .into_iter()
            .map(|hit| hit.text.to_string())
            .collect()
    }
}

fn count_terms(tokens: &[String], vocabulary: &HashMap<String, usize>) -> HashMap<usize, usize> {
    let mut counts = HashMap::new();
    for token in tokens {
        if let Some(&term) = vocabulary.get(token) {
            *counts.entry(term).or_insert(0) += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> LexicalIndex {
        LexicalIndex::build([
            ("d0", "quarterly revenue grew in the north region"),
            ("d1", "housing market cooled as mortgage rates rose"),
            ("d2", "revenue revenue forecast for the south region"),
        ])
    }

    #[test]
    fn empty_index_returns_no_hits() {
        let index = LexicalIndex::build(Vec::<(String, String)>::new());
        assert!(index.is_empty());
        assert!(index.search("anything", 5).is_empty());
    }

    #[test]
    fn zero_k_returns_no_hits() {
        assert!(sample_index().search("revenue", 0).is_empty());
    }

    #[test]
    fn never_returns_more_than_k() {
        let index = sample_index();
        assert_eq!(index.search("revenue", 2).len(), 2);
        assert_eq!(index.search("revenue", 10).len(), 3);
    }

    #[test]
    fn ranks_most_similar_document_first() {
        let index = sample_index();
        let hits = index.search("mortgage rates", 3);
        assert_eq!(hits[0].id, "d1");
        assert!(hits[0].score > 0.0);
        assert_eq!(hits[1].score, 0.0);
    }

    #[test]
    fn higher_term_frequency_ranks_higher() {
        let index = sample_index();
        let hits = index.search("revenue", 3);
        assert_eq!(hits[0].id, "d2");
        assert_eq!(hits[1].id, "d0");
    }

    #[test]
    fn ties_keep_insertion_order() {
        let index = LexicalIndex::build([("a", "alpha beta"), ("b", "alpha beta"), ("c", "gamma")]);
        let ids: Vec<&str> = index.search("alpha", 3).iter().map(|h| h.id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn unseen_query_terms_do_not_grow_vocabulary() {
        let index = sample_index();
        let before = index.vocabulary_size();
        let query = index.embed("zeppelin");
        assert!(query.is_zero());
        assert_eq!(index.vocabulary_size(), before);
    }

    #[test]
    fn common_terms_are_down_weighted() {
        let index = sample_index();
        let doc = index.embed("region north");
        let region = index.vocabulary["region"];
        let north = index.vocabulary["north"];
        assert!(doc.weight(north) > doc.weight(region));
    }

    #[test]
    fn vectors_are_unit_length() {
        let v = sample_index().embed("revenue forecast south");
        let self_sim = v.cosine(&v);
        assert!((self_sim - 1.0).abs() < 1e-9, "got {self_sim}");
    }

    #[test]
    fn rebuilding_is_idempotent() {
        let first = sample_index();
        let second = sample_index();
        let ids = |idx: &LexicalIndex| -> Vec<String> {
            idx.search("revenue region", 3)
                .iter()
                .map(|h| h.id.to_string())
                .collect()
        };
        assert_eq!(ids(&first), ids(&second));
    }
}
