//! Token valence lexicon.
//!
//! Lines are `token<TAB>valence[<TAB>...]`; valences run from about -4
//! (most negative) to +4 (most positive). Extra columns, blank lines and
//! `#` comments are ignored.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use crate::error::SentimentError;

static BUILTIN: LazyLock<Result<Lexicon, SentimentError>> =
    LazyLock::new(|| Lexicon::parse(include_str!("vader_lexicon.txt")));

/// The process-wide built-in lexicon, parsed on first use.
///
/// # Errors
///
/// Returns [`SentimentError::Lexicon`] if the embedded lexicon failed to parse.
pub fn builtin_lexicon() -> Result<&'static Lexicon, SentimentError> {
    BUILTIN.as_ref().map_err(Clone::clone)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lexicon {
    valences: HashMap<String, f64>,
}

impl Lexicon {
    /// # Errors
    ///
    /// Returns [`SentimentError::Lexicon`] for a line without a numeric
    /// valence, or when no entries are found.
    pub fn parse(text: &str) -> Result<Self, SentimentError> {
        let mut valences = HashMap::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim_end();
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split('\t');
            let token = fields.next().map(str::trim).unwrap_or_default();
            let valence = fields
                .next()
                .and_then(|raw| raw.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite());
            match (token.is_empty(), valence) {
                (false, Some(valence)) => {
                    valences.insert(token.to_lowercase(), valence);
                }
                _ => {
                    return Err(SentimentError::Lexicon(format!(
                        "line {}: expected `token<TAB>valence`, got {line:?}",
                        idx + 1
                    )))
                }
            }
        }
        if valences.is_empty() {
            return Err(SentimentError::Lexicon("no entries".to_string()));
        }
        Ok(Self { valences })
    }

    /// # Errors
    ///
    /// Returns [`SentimentError::Lexicon`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, SentimentError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            SentimentError::Lexicon(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::parse(&text)
    }

    /// Valence for a lowercase token.
    #[must_use]
    pub fn valence(&self, token: &str) -> Option<f64> {
        self.valences.get(token).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.valences.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lexicon_loads_once_and_is_shared() {
        let first = builtin_lexicon().expect("embedded lexicon parses");
        let second = builtin_lexicon().expect("embedded lexicon parses");
        assert!(std::ptr::eq(first, second));
        assert!(first.valence("good").is_some_and(|v| v > 0.0));
        assert!(first.valence("crisis").is_some_and(|v| v < 0.0));
    }

    #[test]
    fn parses_extra_columns_and_comments() {
        let lexicon = Lexicon::parse("# header\n\nGood\t1.9\t0.9\t[2, 2]\nbad\t-2.5\n")
            .expect("valid lexicon");
        assert_eq!(lexicon.len(), 2);
        assert_eq!(lexicon.valence("good"), Some(1.9));
    }

    #[test]
    fn rejects_non_numeric_valence() {
        let err = Lexicon::parse("good\tvery\n").expect_err("invalid valence");
        assert!(matches!(err, SentimentError::Lexicon(msg) if msg.starts_with("line 1")));
    }

    #[test]
    fn rejects_empty_lexicon() {
        assert!(Lexicon::parse("# nothing\n").is_err());
    }

    #[test]
    fn missing_file_is_a_lexicon_error() {
        let err = Lexicon::from_file(Path::new("/nonexistent/lexicon.txt")).expect_err("missing");
        assert!(matches!(err, SentimentError::Lexicon(_)));
    }
}
