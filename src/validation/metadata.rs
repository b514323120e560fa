use serde::Deserialize;
use serde_json::{Map, Value};

/// The fields of `metadata.json` the policy checks read. Everything else is
/// covered by the schema alone.
#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    #[serde(rename = "$schema")]
    pub schema: Option<String>,
    pub service: String,
    pub version: String,
    /// Language tag to description, in document order.
    #[serde(default)]
    pub description: Map<String, Value>,
    #[serde(default)]
    pub iframe: Option<bool>,
}

impl Metadata {
    pub fn wants_iframe(&self) -> bool {
        self.iframe.unwrap_or(false)
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.description.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_description_keeps_document_order() {
        let metadata: Metadata = serde_json::from_value(json!({
            "service": "Example",
            "version": "1.0.0",
            "description": {"nl": "x", "en": "y", "de": "z"}
        }))
        .unwrap();
        assert_eq!(metadata.languages().collect::<Vec<_>>(), ["nl", "en", "de"]);
        assert!(!metadata.wants_iframe());
        assert_eq!(metadata.schema, None);
    }
}
