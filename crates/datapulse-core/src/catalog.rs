use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Fixed domain phrases merged into every keyword set.
///
/// Keys are domain names; each domain carries a list of search phrases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCatalog {
    pub domains: BTreeMap<String, Vec<String>>,
}

impl KeywordCatalog {
    /// Every phrase across all domains, in domain-name order.
    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.domains.values().flatten().map(String::as_str)
    }
}

impl Default for KeywordCatalog {
    fn default() -> Self {
        let domain = |phrases: &[&str]| -> Vec<String> {
            phrases.iter().map(|p| (*p).to_string()).collect()
        };
        let mut domains: BTreeMap<String, Vec<String>> = BTreeMap::new();
        domains.insert(
            "finance".to_string(),
            domain(&[
                "stock market",
                "cryptocurrency",
                "banking",
                "investment",
                "fintech",
            ]),
        );
        domains.insert(
            "ai".to_string(),
            domain(&[
                "artificial intelligence",
                "machine learning",
                "deep learning",
                "robotics",
                "neural networks",
            ]),
        );
        domains.insert(
            "real_estate".to_string(),
            domain(&[
                "property market",
                "real estate trends",
                "housing market",
                "commercial property",
                "real estate investment",
            ]),
        );
        Self { domains }
    }
}

/// Load and validate a keyword catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_keyword_catalog(path: &Path) -> Result<KeywordCatalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_keyword_catalog(&content)
}

/// Parse and validate a keyword catalog from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_keyword_catalog(yaml: &str) -> Result<KeywordCatalog, ConfigError> {
    let catalog: KeywordCatalog = serde_yaml::from_str(yaml)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

fn validate_catalog(catalog: &KeywordCatalog) -> Result<(), ConfigError> {
    if catalog.domains.is_empty() {
        return Err(ConfigError::Validation(
            "catalog must define at least one domain".to_string(),
        ));
    }

    let mut seen_domains = HashSet::new();
    for (name, phrases) in &catalog.domains {
        if name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "domain name must be non-empty".to_string(),
            ));
        }
        if !seen_domains.insert(name.trim().to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate domain name: '{name}'"
            )));
        }
        if let Some(idx) = phrases.iter().position(|p| p.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "domain '{name}' has a blank phrase at position {idx}"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_has_three_domains_of_five_phrases() {
        let catalog = KeywordCatalog::default();
        assert_eq!(catalog.domains.len(), 3);
        assert!(catalog.domains.values().all(|p| p.len() == 5));
        assert!(catalog.phrases().any(|p| p == "machine learning"));
    }

    #[test]
    fn parses_valid_yaml() {
        let yaml = "domains:\n  energy: [solar power, oil prices]\n";
        let catalog = parse_keyword_catalog(yaml).expect("parse");
        assert_eq!(
            catalog.phrases().collect::<Vec<_>>(),
            vec!["solar power", "oil prices"]
        );
    }

    #[test]
    fn rejects_empty_domain_map() {
        let err = parse_keyword_catalog("domains: {}\n").unwrap_err();
        assert!(err.to_string().contains("at least one domain"));
    }

    #[test]
    fn rejects_blank_phrase() {
        let yaml = "domains:\n  energy: [solar power, '  ']\n";
        let err = parse_keyword_catalog(yaml).unwrap_err();
        assert!(err.to_string().contains("blank phrase at position 1"));
    }

    #[test]
    fn rejects_malformed_yaml() {
        let err = parse_keyword_catalog("domains: [unterminated").unwrap_err();
        assert!(matches!(err, ConfigError::CatalogFileParse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_keyword_catalog(Path::new("/nonexistent/catalog.yaml")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::CatalogFileIo { ref path, .. } if path.contains("catalog.yaml")
        ));
    }
}
