//! Keyword extraction from dataset structure and content.

use std::collections::HashSet;

use datapulse_core::{ColumnKind, Dataset, KeywordCatalog};

const NUMERIC_SUFFIXES: [&str; 3] = ["trend", "analysis", "forecast"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordExtraction {
    /// Deduplicated keywords in insertion order.
    pub keywords: Vec<String>,
    /// Columns whose values were skipped because their cells contradict the column tag.
    pub columns_skipped: usize,
}

#[derive(Default)]
struct KeywordSet {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl KeywordSet {
    /// Entries are kept verbatim; only whitespace-only entries are discarded.
    fn push(&mut self, raw: &str) {
        if raw.trim().is_empty() || self.seen.contains(raw) {
            return;
        }
        self.seen.insert(raw.to_string());
        self.ordered.push(raw.to_string());
    }
}

/// Derive search keywords from a dataset plus the fixed domain catalog.
///
/// Order is column names, then distinct text values, then
/// `"<col> trend|analysis|forecast"` for numeric columns, then catalog
/// phrases. A dataset without columns yields no keywords at all.
#[must_use]
pub fn extract_keywords(dataset: &Dataset, catalog: &KeywordCatalog) -> KeywordExtraction {
    if dataset.is_empty() {
        return KeywordExtraction::default();
    }

    let mut set = KeywordSet::default();
    let mut text_values = Vec::new();
    let mut numeric_phrases = Vec::new();
    let mut columns_skipped = 0;

    for column in dataset.columns() {
        set.push(&column.name);

        match column.verified_kind() {
            Ok(ColumnKind::Text) => text_values.extend(column.distinct_values()),
            Ok(ColumnKind::Numeric) => numeric_phrases.extend(
                NUMERIC_SUFFIXES
                    .iter()
                    .map(|suffix| format!("{} {suffix}", column.name)),
            ),
            Ok(ColumnKind::Temporal | ColumnKind::Boolean) => {}
            Err(e) => {
                columns_skipped += 1;
                tracing::warn!(
                    column = %column.name,
                    error = %e,
                    "skipping column values during keyword extraction"
                );
            }
        }
    }

    for value in &text_values {
        set.push(value);
    }
    for phrase in &numeric_phrases {
        set.push(phrase);
    }
    for phrase in catalog.phrases() {
        set.push(phrase);
    }

    tracing::debug!(
        keywords = set.ordered.len(),
        columns_skipped,
        "extracted keywords"
    );

    KeywordExtraction {
        keywords: set.ordered,
        columns_skipped,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use datapulse_core::{CellValue, Column};

    use super::*;

    fn text(values: &[&str]) -> Vec<CellValue> {
        values
            .iter()
            .map(|v| CellValue::Text((*v).to_string()))
            .collect()
    }

    fn sales_dataset() -> Dataset {
        Dataset::new(vec![
            Column::new("region", ColumnKind::Text, text(&["North", "South", "North"])),
            Column::new(
                "revenue",
                ColumnKind::Numeric,
                vec![CellValue::Number(10.0), CellValue::Number(12.5)],
            ),
        ])
    }

    fn empty_catalog() -> KeywordCatalog {
        KeywordCatalog {
            domains: BTreeMap::new(),
        }
    }

    #[test]
    fn keywords_contain_every_column_name() {
        let out = extract_keywords(&sales_dataset(), &KeywordCatalog::default());
        assert!(out.keywords.contains(&"region".to_string()));
        assert!(out.keywords.contains(&"revenue".to_string()));
    }

    #[test]
    fn orders_columns_values_phrases_then_catalog() {
        let out = extract_keywords(&sales_dataset(), &empty_catalog());
        assert_eq!(
            out.keywords,
            vec![
                "region",
                "revenue",
                "North",
                "South",
                "revenue trend",
                "revenue analysis",
                "revenue forecast",
            ]
        );
    }

    #[test]
    fn catalog_phrases_come_last() {
        let out = extract_keywords(&sales_dataset(), &KeywordCatalog::default());
        assert_eq!(out.keywords.len(), 7 + 15);
        assert_eq!(out.keywords[7], "artificial intelligence");
    }

    #[test]
    fn empty_dataset_yields_no_keywords() {
        let out = extract_keywords(&Dataset::default(), &KeywordCatalog::default());
        assert!(out.keywords.is_empty());
    }

    #[test]
    fn blank_values_are_discarded_and_duplicates_dropped() {
        let dataset = Dataset::new(vec![Column::new(
            "city",
            ColumnKind::Text,
            text(&["  ", "city", "Austin", "Austin"]),
        )]);
        let out = extract_keywords(&dataset, &empty_catalog());
        assert_eq!(out.keywords, vec!["city", "Austin"]);
    }

    #[test]
    fn padded_column_names_are_kept_verbatim() {
        let dataset = Dataset::new(vec![Column::new(
            "Revenue ",
            ColumnKind::Numeric,
            vec![CellValue::Number(3.0)],
        )]);
        let out = extract_keywords(&dataset, &empty_catalog());
        assert!(out.keywords.contains(&"Revenue ".to_string()));
        assert_eq!(
            out.keywords,
            vec![
                "Revenue ",
                "Revenue  trend",
                "Revenue  analysis",
                "Revenue  forecast",
            ]
        );
    }

    #[test]
    fn mismatched_column_keeps_name_but_skips_values() {
        let dataset = Dataset::new(vec![
            Column::new(
                "price",
                ColumnKind::Numeric,
                vec![CellValue::Number(1.0), CellValue::Text("n/a".to_string())],
            ),
            Column::new("brand", ColumnKind::Text, text(&["Acme"])),
        ]);
        let out = extract_keywords(&dataset, &empty_catalog());
        assert_eq!(out.columns_skipped, 1);
        assert_eq!(out.keywords, vec!["price", "brand", "Acme"]);
    }

    #[test]
    fn temporal_and_boolean_columns_contribute_only_names() {
        let dataset = Dataset::new(vec![
            Column::new("active", ColumnKind::Boolean, vec![CellValue::Bool(true)]),
            Column::new("day", ColumnKind::Temporal, vec![CellValue::Missing]),
        ]);
        let out = extract_keywords(&dataset, &empty_catalog());
        assert_eq!(out.keywords, vec!["active", "day"]);
    }
}
