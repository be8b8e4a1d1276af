//! Documents fed to the lexical index, and the closed set of sources they come from.

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, DatasetError};

/// Kind of file a text document was extracted from.
///
/// Extraction itself (PDF pages, Word paragraphs) happens upstream; by the
/// time a file reaches this crate it is plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Pdf,
    Word,
    PlainText,
    Json,
}

impl FileKind {
    /// Map a file name to its kind by extension, case-insensitively.
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = name.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(FileKind::Pdf),
            "docx" => Some(FileKind::Word),
            "txt" | "md" => Some(FileKind::PlainText),
            "json" => Some(FileKind::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentOrigin {
    DatasetRow { row: usize },
    File { name: String, kind: FileKind },
}

impl DocumentOrigin {
    /// Human-readable label used when citing a document as context.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            DocumentOrigin::DatasetRow { row } => format!("row {row}"),
            DocumentOrigin::File { name, .. } => name.clone(),
        }
    }
}

/// A unit of searchable text. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    id: String,
    text: String,
    origin: DocumentOrigin,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>, origin: DocumentOrigin) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            origin,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn origin(&self) -> &DocumentOrigin {
        &self.origin
    }
}

/// Everything that can be ingested into a document collection.
#[derive(Debug, Clone)]
pub enum IngestSource {
    /// A table; each row becomes one document.
    Dataset(Dataset),
    /// Text already extracted from an uploaded file.
    File {
        name: String,
        kind: FileKind,
        text: String,
    },
}

impl IngestSource {
    /// Classify an uploaded file by name.
    ///
    /// JSON files are parsed as dataset records; every other supported kind is
    /// taken as extracted text.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::UnsupportedFile`] for unknown extensions, or a
    /// parse error when a JSON file is not a valid record array.
    pub fn from_file(name: &str, contents: String) -> Result<Self, DatasetError> {
        let kind = FileKind::from_file_name(name).ok_or_else(|| DatasetError::UnsupportedFile {
            name: name.to_string(),
        })?;
        match kind {
            FileKind::Json => Ok(IngestSource::Dataset(Dataset::from_json_records(&contents)?)),
            kind => Ok(IngestSource::File {
                name: name.to_string(),
                kind,
                text: contents,
            }),
        }
    }

    /// Normalize the source into documents.
    #[must_use]
    pub fn into_documents(self) -> Vec<Document> {
        match self {
            IngestSource::Dataset(dataset) => dataset
                .rendered_rows()
                .enumerate()
                .map(|(row, text)| {
                    Document::new(format!("row-{row}"), text, DocumentOrigin::DatasetRow { row })
                })
                .collect(),
            IngestSource::File { name, kind, text } => {
                vec![Document::new(
                    format!("file-{name}"),
                    text,
                    DocumentOrigin::File { name, kind },
                )]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{CellValue, Column, ColumnKind};

    #[test]
    fn file_kind_from_extension() {
        assert_eq!(FileKind::from_file_name("Report.PDF"), Some(FileKind::Pdf));
        assert_eq!(FileKind::from_file_name("notes.docx"), Some(FileKind::Word));
        assert_eq!(FileKind::from_file_name("readme.md"), Some(FileKind::PlainText));
        assert_eq!(FileKind::from_file_name("data.json"), Some(FileKind::Json));
        assert_eq!(FileKind::from_file_name("sheet.xls"), None);
        assert_eq!(FileKind::from_file_name("no_extension"), None);
    }

    #[test]
    fn unsupported_file_is_rejected() {
        let err = IngestSource::from_file("image.png", String::new()).unwrap_err();
        assert!(matches!(err, DatasetError::UnsupportedFile { ref name } if name == "image.png"));
    }

    #[test]
    fn json_file_becomes_dataset() {
        let source =
            IngestSource::from_file("sales.json", r#"[{"region": "west"}]"#.to_string()).unwrap();
        assert!(matches!(source, IngestSource::Dataset(_)));
    }

    #[test]
    fn dataset_rows_become_documents() {
        let ds = Dataset::new(vec![Column::new(
            "city",
            ColumnKind::Text,
            vec![
                CellValue::Text("Austin".to_string()),
                CellValue::Text("Boston".to_string()),
            ],
        )]);
        let docs = IngestSource::Dataset(ds).into_documents();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].id(), "row-1");
        assert_eq!(docs[1].text(), "city: Boston");
        assert_eq!(docs[1].origin().label(), "row 1");
    }

    #[test]
    fn text_file_becomes_single_document() {
        let source = IngestSource::from_file("memo.txt", "quarterly memo".to_string()).unwrap();
        let docs = source.into_documents();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].text(), "quarterly memo");
        assert_eq!(
            docs[0].origin(),
            &DocumentOrigin::File {
                name: "memo.txt".to_string(),
                kind: FileKind::PlainText
            }
        );
    }
}
