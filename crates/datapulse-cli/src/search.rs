//! `search` command handler.

use std::path::{Path, PathBuf};

use anyhow::Context;
use datapulse_core::IngestSource;
use datapulse_retrieval::DocumentCollection;

use crate::load_dataset;

pub(crate) fn run_search(
    query: &str,
    k: usize,
    dataset: Option<&Path>,
    docs: &[PathBuf],
) -> anyhow::Result<()> {
    let collection = build_collection(dataset, docs)?;
    if collection.is_empty() {
        println!("nothing to search; pass --dataset or --doc");
        return Ok(());
    }

    for (rank, hit) in collection.search_hits(query, k).iter().enumerate() {
        println!("{}. [{:.3}] {}", rank + 1, hit.score, hit.text);
    }
    Ok(())
}

pub(crate) fn build_collection(
    dataset: Option<&Path>,
    docs: &[PathBuf],
) -> anyhow::Result<DocumentCollection> {
    let mut collection = DocumentCollection::new();
    if let Some(path) = dataset {
        let rows = collection.ingest(IngestSource::Dataset(load_dataset(path)?));
        tracing::info!(file = %path.display(), documents = rows, "ingested dataset");
    }
    for path in docs {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("invalid file name {}", path.display()))?;
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let added = collection
            .ingest_file(name, contents)
            .with_context(|| format!("failed to ingest {}", path.display()))?;
        tracing::info!(file = %path.display(), documents = added, "ingested");
    }
    Ok(collection)
}
