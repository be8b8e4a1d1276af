//! Shared dataset, document and configuration types for datapulse.

pub mod app_config;
pub mod catalog;
pub mod config;
pub mod dataset;
pub mod document;

use thiserror::Error;

pub use app_config::{AppConfig, SearchBackend};
pub use catalog::{load_keyword_catalog, parse_keyword_catalog, KeywordCatalog};
pub use config::{load_app_config, load_app_config_from_env};
pub use dataset::{CellValue, Column, ColumnKind, Dataset, DatasetError};
pub use document::{Document, DocumentOrigin, FileKind, IngestSource};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read keyword catalog {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse keyword catalog: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),

    #[error("keyword catalog validation failed: {0}")]
    Validation(String),
}
