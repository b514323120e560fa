//! A loaded `metadata.json`: raw text, decoded value and position tree

use serde_json::Value;
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::json_ast::{ParseError, SyntaxTree};
use crate::locator::{self, Selector};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("metadata.json is missing")]
    Missing,
    #[error("failed to read metadata.json: {0}")]
    Unreadable(#[source] io::Error),
    #[error("metadata.json is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("metadata.json is not valid JSON: {0}")]
    Syntax(#[source] ParseError),
}

impl LoadError {
    /// Line the failure was detected on, when the parser reported one.
    pub fn line(&self) -> Option<usize> {
        match self {
            LoadError::InvalidJson(e) => Some(e.line()).filter(|l| *l > 0),
            LoadError::Syntax(e) => Some(e.line),
            LoadError::Missing | LoadError::Unreadable(_) => None,
        }
    }
}

/// The decoded value drives the checks; the text is kept for line lookups.
#[derive(Debug)]
pub struct Document {
    pub text: String,
    pub value: Value,
}

impl Document {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(LoadError::Missing),
            Err(e) => return Err(LoadError::Unreadable(e)),
        };
        Self::from_text(text)
    }

    pub fn from_text(text: String) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_str(&text).map_err(LoadError::InvalidJson)?;
        SyntaxTree::parse(&text).map_err(LoadError::Syntax)?;
        Ok(Self { text, value })
    }

    /// Line of a top-level key, or of a value inside it. See [`locator::locate`].
    pub fn line_of(&self, key: &str, selector: Option<&Selector>) -> Option<usize> {
        locator::locate(&self.text, key, selector).ok().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_of_matches_locate() {
        let text = "{\n  \"service\": \"Example\",\n  \"tags\": [\"a\",\n \"b\"]\n}".to_string();
        let doc = Document::from_text(text.clone()).unwrap();
        let selector = Selector::key("b");
        assert_eq!(
            doc.line_of("tags", Some(&selector)),
            locator::locate(&text, "tags", Some(&selector)).unwrap()
        );
        assert_eq!(doc.line_of("tags", Some(&selector)), Some(4));
        assert_eq!(doc.line_of("service", None), Some(2));
    }

    #[test]
    fn test_lookups_read_the_loaded_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        let text = "{\r\n  \"\\u0076ersion\": \"1.0.0\",\r\n  \"description\": {\r\n    \"en\": \"x\"\r\n  }\r\n}";
        std::fs::write(&path, text).unwrap();

        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.text, text);
        assert_eq!(doc.line_of("version", None), Some(2));
        assert_eq!(doc.line_of("description", Some(&Selector::key("en"))), Some(4));
    }

    #[test]
    fn test_invalid_json_reports_line() {
        let err = Document::from_text("{\n\"a\": 1,\n}".to_string()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidJson(_)));
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Document::load(&dir.path().join("metadata.json")).unwrap_err();
        assert!(matches!(err, LoadError::Missing));
        assert_eq!(err.line(), None);
    }
}
