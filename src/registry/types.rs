//! Wire types for registry and schema responses.

use serde::Deserialize;
use serde_json::Value;

/// Metadata of a presence as currently published in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PublishedMetadata {
    pub service: String,
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishedPresence {
    pub metadata: PublishedMetadata,
}

/// The metadata schema every entry must declare and conform to.
#[derive(Debug, Clone)]
pub struct LatestSchema {
    /// Value entries must carry in their `$schema` field.
    pub id: String,
    pub document: Value,
}

impl LatestSchema {
    /// The identifier is the schema's own `$id`, or the URL it was served
    /// from when it has none.
    pub fn from_document(source_url: &str, document: Value) -> Self {
        let id = document
            .get("$id")
            .and_then(Value::as_str)
            .map(|id| id.trim_end_matches('#').to_string())
            .unwrap_or_else(|| source_url.to_string());
        Self { id, document }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PresencesData {
    #[serde(default)]
    pub presences: Vec<PublishedPresence>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LangFilesData {
    #[serde(default)]
    pub lang_files: Vec<LangFile>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LangFile {
    pub lang: String,
}
