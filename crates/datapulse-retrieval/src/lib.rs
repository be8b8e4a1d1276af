//! Lexical retrieval over an in-memory document collection.
//!
//! Documents are weighted with TF-IDF over the vocabulary of the whole
//! collection and ranked against a query by cosine similarity. The ranked
//! texts feed the question-answering step as grounding context.

pub mod collection;
pub mod index;
pub mod tokenizer;

pub use collection::DocumentCollection;
pub use index::{LexicalIndex, SearchHit, TermVector};

/// Index `documents` and return the texts of the `k` best matches for `query`.
///
/// Returns an empty `Vec` when `documents` is empty or `k` is zero.
pub fn index_and_search<I, K, V>(documents: I, query: &str, k: usize) -> Vec<String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    LexicalIndex::build(documents).search_texts(query, k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_and_search_returns_best_texts() {
        let docs = vec![
            ("a", "solar panel installations doubled"),
            ("b", "interest rates held steady"),
        ];
        assert_eq!(
            index_and_search(docs, "interest rates", 1),
            vec!["interest rates held steady"]
        );
    }

    #[test]
    fn index_and_search_on_empty_input() {
        let docs: Vec<(String, String)> = Vec::new();
        assert!(index_and_search(docs, "anything", 5).is_empty());
    }
}
