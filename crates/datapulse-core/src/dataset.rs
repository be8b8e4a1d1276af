//! Tabular dataset model supplied by the ingestion layer.
//!
//! Columns carry a type tag from the dataset source. Cells are loosely typed,
//! so a hand-built column can contradict its tag; [`Column::verified_kind`]
//! reports that as a [`DatasetError::KindMismatch`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("column \"{column}\" is tagged {expected} but row {row} holds a {found} value")]
    KindMismatch {
        column: String,
        row: usize,
        expected: ColumnKind,
        found: &'static str,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid dataset records: {0}")]
    InvalidRecords(String),

    #[error("unsupported file \"{name}\"; expected .json, .txt, .md, .pdf or .docx")]
    UnsupportedFile { name: String },
}

/// Type tag for a dataset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Text,
    Temporal,
    Boolean,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Text => write!(f, "text"),
            ColumnKind::Temporal => write!(f, "temporal"),
            ColumnKind::Boolean => write!(f, "boolean"),
        }
    }
}

impl ColumnKind {
    /// Whether a cell is allowed in a column with this tag.
    ///
    /// Missing cells fit every kind; text columns accept anything since
    /// their values are coerced to strings downstream.
    #[must_use]
    pub fn accepts(self, value: &CellValue) -> bool {
        match (self, value) {
            (_, CellValue::Missing)
            | (ColumnKind::Text, _)
            | (ColumnKind::Numeric, CellValue::Number(_))
            | (ColumnKind::Temporal, CellValue::Timestamp(_))
            | (ColumnKind::Boolean, CellValue::Bool(_)) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    Missing,
}

impl CellValue {
    #[must_use]
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Missing => true,
            CellValue::Number(n) => n.is_nan(),
            _ => false,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            CellValue::Text(_) => "text",
            CellValue::Number(_) => "numeric",
            CellValue::Bool(_) => "boolean",
            CellValue::Timestamp(_) => "temporal",
            CellValue::Missing => "missing",
        }
    }

    fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => CellValue::Missing,
            Value::Bool(b) => CellValue::Bool(*b),
            Value::Number(n) => n.as_f64().map_or(CellValue::Missing, CellValue::Number),
            Value::String(s) => DateTime::parse_from_rfc3339(s).map_or_else(
                |_| CellValue::Text(s.clone()),
                |ts| CellValue::Timestamp(ts.with_timezone(&Utc)),
            ),
            nested @ (Value::Array(_) | Value::Object(_)) => CellValue::Text(nested.to_string()),
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Number(n) if n.is_nan() => Ok(()),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Missing => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind, values: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            kind,
            values,
        }
    }

    /// Return the column's tag after checking every cell against it.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::KindMismatch`] for the first cell the tag does not accept.
    pub fn verified_kind(&self) -> Result<ColumnKind, DatasetError> {
        match self
            .values
            .iter()
            .enumerate()
            .find(|(_, value)| !self.kind.accepts(value))
        {
            Some((row, value)) => Err(DatasetError::KindMismatch {
                column: self.name.clone(),
                row,
                expected: self.kind,
                found: value.type_name(),
            }),
            None => Ok(self.kind),
        }
    }

    /// Distinct non-missing values rendered as strings, in first-seen order.
    #[must_use]
    pub fn distinct_values(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.values
            .iter()
            .filter(|v| !v.is_missing())
            .map(ToString::to_string)
            .filter(|s| seen.insert(s.clone()))
            .collect()
    }
}

/// An in-memory table: named, typed columns of equal or ragged length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    #[must_use]
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// A dataset with no columns carries no schema to derive anything from.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of rows, taken from the longest column.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.columns.iter().map(|c| c.values.len()).max().unwrap_or(0)
    }

    /// Render one row as `"col: value | col: value"`.
    ///
    /// Cells past the end of a short column render as empty values.
    #[must_use]
    pub fn render_row(&self, row: usize) -> String {
        self.columns
            .iter()
            .map(|c| {
                let value = c.values.get(row).map(ToString::to_string).unwrap_or_default();
                format!("{}: {value}", c.name)
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// Every row rendered with [`Dataset::render_row`].
    pub fn rendered_rows(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.row_count()).map(|row| self.render_row(row))
    }

    /// Build a dataset from a JSON array of flat objects.
    ///
    /// Column order follows first-seen key order. Keys absent from a record
    /// become missing cells. Kinds are inferred from the non-missing cells:
    /// all numbers is numeric, all booleans is boolean, all RFC 3339 strings
    /// is temporal, anything else is text.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Json`] on malformed JSON and
    /// [`DatasetError::InvalidRecords`] when the top level is not an array of objects.
    pub fn from_json_records(json: &str) -> Result<Self, DatasetError> {
        let parsed: Value = serde_json::from_str(json)?;
        let Value::Array(records) = parsed else {
            return Err(DatasetError::InvalidRecords(
                "top-level value must be an array".to_string(),
            ));
        };

        let mut names: Vec<String> = Vec::new();
        for (idx, record) in records.iter().enumerate() {
            let Value::Object(fields) = record else {
                return Err(DatasetError::InvalidRecords(format!(
                    "record {idx} is not an object"
                )));
            };
            for key in fields.keys() {
                if !names.contains(key) {
                    names.push(key.clone());
                }
            }
        }

        let columns = names
            .into_iter()
            .map(|name| {
                let values: Vec<CellValue> = records
                    .iter()
                    .map(|record| {
                        record
                            .get(&name)
                            .map_or(CellValue::Missing, CellValue::from_json)
                    })
                    .collect();
                let kind = infer_kind(&values);
                Column::new(name, kind, values)
            })
            .collect();

        Ok(Self::new(columns))
    }
}

fn infer_kind(values: &[CellValue]) -> ColumnKind {
    let mut present = values.iter().filter(|v| !v.is_missing()).peekable();
    if present.peek().is_none() {
        return ColumnKind::Text;
    }
    let present: Vec<&CellValue> = present.collect();
    if present.iter().all(|v| matches!(v, CellValue::Number(_))) {
        ColumnKind::Numeric
    } else if present.iter().all(|v| matches!(v, CellValue::Bool(_))) {
        ColumnKind::Boolean
    } else if present.iter().all(|v| matches!(v, CellValue::Timestamp(_))) {
        ColumnKind::Temporal
    } else {
        ColumnKind::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn from_json_records_infers_kinds_in_key_order() {
        let json = r#"[
            {"price": 10.5, "region": "north", "listed": "2024-01-01T00:00:00Z", "active": true},
            {"price": 12, "region": "south", "listed": "2024-01-02T00:00:00Z", "active": false}
        ]"#;
        let ds = Dataset::from_json_records(json).expect("parse");
        assert_eq!(ds.column_names(), vec!["price", "region", "listed", "active"]);
        let kinds: Vec<ColumnKind> = ds.columns().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ColumnKind::Numeric,
                ColumnKind::Text,
                ColumnKind::Temporal,
                ColumnKind::Boolean
            ]
        );
        assert_eq!(ds.row_count(), 2);
    }

    #[test]
    fn from_json_records_fills_missing_keys() {
        let json = r#"[{"a": 1}, {"b": "x"}]"#;
        let ds = Dataset::from_json_records(json).expect("parse");
        assert_eq!(ds.columns()[0].values, vec![CellValue::Number(1.0), CellValue::Missing]);
        assert_eq!(ds.columns()[1].values, vec![CellValue::Missing, text("x")]);
    }

    #[test]
    fn mixed_column_is_text() {
        let json = r#"[{"code": 7}, {"code": "A7"}]"#;
        let ds = Dataset::from_json_records(json).expect("parse");
        assert_eq!(ds.columns()[0].kind, ColumnKind::Text);
        assert_eq!(ds.columns()[0].distinct_values(), vec!["7", "A7"]);
    }

    #[test]
    fn from_json_records_rejects_non_array() {
        let err = Dataset::from_json_records(r#"{"a": 1}"#).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidRecords(_)));
    }

    #[test]
    fn from_json_records_rejects_scalar_record() {
        let err = Dataset::from_json_records("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("record 0"));
    }

    #[test]
    fn empty_array_is_empty_dataset() {
        let ds = Dataset::from_json_records("[]").expect("parse");
        assert!(ds.is_empty());
        assert_eq!(ds.row_count(), 0);
    }

    #[test]
    fn verified_kind_reports_first_mismatch() {
        let col = Column::new(
            "revenue",
            ColumnKind::Numeric,
            vec![CellValue::Number(1.0), CellValue::Missing, text("n/a")],
        );
        let err = col.verified_kind().unwrap_err();
        assert!(matches!(
            err,
            DatasetError::KindMismatch {
                ref column,
                row: 2,
                found: "text",
                ..
            } if column == "revenue"
        ));
    }

    #[test]
    fn text_column_accepts_any_cell() {
        let col = Column::new(
            "notes",
            ColumnKind::Text,
            vec![text("a"), CellValue::Number(2.0), CellValue::Bool(true)],
        );
        assert_eq!(col.verified_kind().unwrap(), ColumnKind::Text);
    }

    #[test]
    fn distinct_values_skip_missing_and_nan() {
        let col = Column::new(
            "fruit",
            ColumnKind::Text,
            vec![
                text("apple"),
                CellValue::Missing,
                text("apple"),
                CellValue::Number(f64::NAN),
                text("pear"),
            ],
        );
        assert_eq!(col.distinct_values(), vec!["apple", "pear"]);
    }

    #[test]
    fn render_row_joins_column_value_pairs() {
        let ds = Dataset::new(vec![
            Column::new("city", ColumnKind::Text, vec![text("Austin")]),
            Column::new("units", ColumnKind::Numeric, vec![CellValue::Number(3.0)]),
        ]);
        assert_eq!(ds.render_row(0), "city: Austin | units: 3");
    }

    #[test]
    fn render_row_tolerates_ragged_columns() {
        let ds = Dataset::new(vec![
            Column::new("a", ColumnKind::Text, vec![text("x"), text("y")]),
            Column::new("b", ColumnKind::Text, vec![text("z")]),
        ]);
        assert_eq!(ds.rendered_rows().collect::<Vec<_>>(), vec!["a: x | b: z", "a: y | b: "]);
    }
}
