use datapulse_core::{DatasetError, Document, IngestSource};

use crate::index::{LexicalIndex, SearchHit};

/// The session's searchable documents and the index built over them.
///
/// Every ingest rebuilds the index from scratch so documents and term
/// vectors never drift apart. At most one dataset is active at a time:
/// ingesting a new one replaces the previous rows, while file documents
/// accumulate.
#[derive(Debug, Default)]
pub struct DocumentCollection {
    dataset_rows: Vec<Document>,
    files: Vec<Document>,
    index: LexicalIndex,
}

impl DocumentCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source and rebuild the index. Returns the number of documents
    /// the source contributed.
    pub fn ingest(&mut self, source: IngestSource) -> usize {
        let replaces_dataset = matches!(source, IngestSource::Dataset(_));
        let docs = source.into_documents();
        let added = docs.len();
        if replaces_dataset {
            self.dataset_rows = docs;
        } else {
            self.files.extend(docs);
        }
        self.rebuild();
        added
    }

    /// Classify an uploaded file by name and ingest it.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] when the file kind is unsupported or a JSON
    /// file is not a valid record array. The collection is left unchanged.
    pub fn ingest_file(&mut self, name: &str, contents: String) -> Result<usize, DatasetError> {
        let source = IngestSource::from_file(name, contents)?;
        Ok(self.ingest(source))
    }

    fn rebuild(&mut self) {
        self.index = LexicalIndex::build(
            self.documents()
                .map(|doc| (doc.id().to_string(), doc.text().to_string())),
        );
        tracing::debug!(
            documents = self.index.len(),
            vocabulary = self.index.vocabulary_size(),
            "rebuilt lexical index"
        );
    }

    /// Dataset rows first, then files in ingest order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.dataset_rows.iter().chain(self.files.iter())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dataset_rows.len() + self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn search_hits(&self, query: &str, k: usize) -> Vec<SearchHit<'_>> {
        self.index.search(query, k)
    }

    /// Texts of the `k` documents most similar to `query`.
    #[must_use]
    pub fn search(&self, query: &str, k: usize) -> Vec<String> {
        self.index.search_texts(query, k)
    }
}
