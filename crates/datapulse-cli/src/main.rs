mod news;
mod search;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use datapulse_core::{AppConfig, Dataset, KeywordCatalog};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "datapulse")]
#[command(about = "Dataset news context and document search")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the search keywords derived from a dataset
    Keywords {
        /// Dataset as a JSON array of flat records
        #[arg(long)]
        dataset: PathBuf,
    },
    /// Find news related to a dataset and classify its sentiment impact
    News {
        /// Dataset as a JSON array of flat records
        #[arg(long)]
        dataset: PathBuf,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rank ingested documents against a query
    Search {
        #[arg(long)]
        query: String,

        /// Number of results; defaults to `DATAPULSE_SEARCH_TOP_K`
        #[arg(short, long)]
        k: Option<usize>,

        /// Dataset whose rows become searchable documents
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Text document to ingest (.txt, .md, .json, or text extracted from .pdf/.docx)
        #[arg(long = "doc")]
        docs: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = datapulse_core::load_app_config()?;
    init_tracing(&config);

    match cli.command {
        Commands::Keywords { dataset } => {
            let catalog = load_catalog(&config)?;
            news::run_keywords(&load_dataset(&dataset)?, &catalog);
        }
        Commands::News { dataset, json } => {
            let catalog = load_catalog(&config)?;
            news::run_news(&config, catalog, &load_dataset(&dataset)?, json).await?;
        }
        Commands::Search {
            query,
            k,
            dataset,
            docs,
        } => {
            let k = k.unwrap_or(config.search_top_k);
            search::run_search(&query, k, dataset.as_deref(), &docs)?;
        }
    }

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_catalog(config: &AppConfig) -> anyhow::Result<KeywordCatalog> {
    match &config.keyword_catalog_path {
        Some(path) => Ok(datapulse_core::load_keyword_catalog(path)?),
        None => Ok(KeywordCatalog::default()),
    }
}

pub(crate) fn load_dataset(path: &std::path::Path) -> anyhow::Result<Dataset> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset {}", path.display()))?;
    Dataset::from_json_records(&raw)
        .with_context(|| format!("failed to parse dataset {}", path.display()))
}
