use crate::error::PanelScanError;
use crate::model::{Rect, Word};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The word list for one page, in reading order, as produced by the
/// external PDF text-layer reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageWords {
    pub page: Rect,
    pub words: Vec<Word>,
}

impl PageWords {
    /// Parse a word fixture: either a single page object or an array
    /// of page objects.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Vec<PageWords>, PanelScanError> {
        let fixture_err = |e: serde_json::Error| PanelScanError::Fixture(e.to_string());
        let value: serde_json::Value = serde_json::from_slice(bytes).map_err(fixture_err)?;
        let pages = if value.is_array() {
            serde_json::from_value(value).map_err(fixture_err)?
        } else {
            vec![serde_json::from_value(value).map_err(fixture_err)?]
        };
        Ok(pages)
    }
}

/// Trait for word-layer acquisition backends. The engine itself does
/// no I/O; production callers wrap their PDF reader in this seam and
/// tests supply pre-built pages.
pub trait WordSource: Send + Sync {
    fn pages(&self) -> Result<Vec<PageWords>, PanelScanError>;

    /// Name of this backend (for diagnostics).
    fn source_name(&self) -> &str;
}

/// Word source backed by a page-words JSON fixture on disk.
pub struct JsonWordSource {
    path: PathBuf,
}

impl JsonWordSource {
    pub fn new(path: impl Into<PathBuf>) -> JsonWordSource {
        JsonWordSource { path: path.into() }
    }
}

impl WordSource for JsonWordSource {
    fn pages(&self) -> Result<Vec<PageWords>, PanelScanError> {
        let bytes = std::fs::read(&self.path)?;
        PageWords::from_json_slice(&bytes)
    }

    fn source_name(&self) -> &str {
        "json-fixture"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_accepts_single_page_object() {
        let json = br#"{
            "page": {"x0": 0, "y0": 0, "x1": 612, "y1": 792},
            "words": [
                {"x0": 10, "y0": 20, "x1": 40, "y1": 28, "text": "PANEL:",
                 "block": 0, "line": 0, "word_no": 0}
            ]
        }"#;
        let pages = PageWords::from_json_slice(json).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].words[0].text, "PANEL:");
    }

    #[test]
    fn fixture_accepts_page_array_and_defaults() {
        let json = br#"[
            {"page": {"x0": 0, "y0": 0, "x1": 612, "y1": 792},
             "words": [{"x0": 1, "y0": 2, "x1": 3, "y1": 4, "text": "K1"}]},
            {"page": {"x0": 0, "y0": 0, "x1": 612, "y1": 792}, "words": []}
        ]"#;
        let pages = PageWords::from_json_slice(json).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].words[0].block, 0);
    }

    #[test]
    fn fixture_rejects_garbage() {
        assert!(PageWords::from_json_slice(b"not json").is_err());
    }

    #[test]
    fn json_source_propagates_missing_file() {
        let source = JsonWordSource::new("/nonexistent/words.json");
        assert!(matches!(source.pages(), Err(PanelScanError::Io(_))));
        assert_eq!(source.source_name(), "json-fixture");
    }
}
