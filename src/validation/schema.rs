//! Schema conformance against the current metadata schema

use jsonschema::error::ValidationErrorKind;
use serde_json::Value;
use thiserror::Error;

use super::diagnostic::Finding;
use super::document::Document;
use crate::locator::Selector;
use crate::registry::LatestSchema;

#[derive(Debug, Error)]
#[error("metadata schema {id} does not compile: {message}")]
pub struct SchemaCompileError {
    pub id: String,
    pub message: String,
}

pub struct SchemaChecker {
    id: String,
    validator: jsonschema::Validator,
}

impl SchemaChecker {
    pub fn new(schema: &LatestSchema) -> Result<Self, SchemaCompileError> {
        let validator = jsonschema::options()
            .build(&schema.document)
            .map_err(|e| SchemaCompileError {
                id: schema.id.clone(),
                message: e.to_string(),
            })?;
        Ok(Self {
            id: schema.id.clone(),
            validator,
        })
    }

    /// Identifier entries must declare in `$schema`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Every schema violation in the document, located where possible.
    pub fn check(&self, document: &Document) -> Vec<Finding> {
        self.validator
            .iter_errors(&document.value)
            .map(|error| {
                let mut segments = pointer_segments(&error.instance_path.to_string());

                // Root-level property errors name the property only in the
                // error kind, not in the instance path. A missing nested
                // property has no line of its own and stays on its parent.
                match &error.kind {
                    ValidationErrorKind::Required { property } if segments.is_empty() => {
                        if let Some(property) = property.as_str() {
                            segments.push(property.to_string());
                        }
                    }
                    ValidationErrorKind::AdditionalProperties { unexpected }
                        if segments.is_empty() =>
                    {
                        segments.extend(unexpected.first().cloned());
                    }
                    _ => {}
                }

                let line = field_path(&document.value, &segments)
                    .and_then(|(key, selector)| document.line_of(key, selector.as_ref()));
                let message = if segments.is_empty() {
                    error.to_string()
                } else {
                    format!("{}: {error}", segments.join("."))
                };
                Finding::schema(message, line)
            })
            .collect()
    }
}

/// Split a JSON pointer into unescaped segments.
fn pointer_segments(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .skip(1)
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
        .collect()
}

/// The top-level key and nested selector the locator understands. Numeric
/// segments only become indices when the value under the key is an array.
fn field_path<'a>(value: &Value, segments: &'a [String]) -> Option<(&'a str, Option<Selector>)> {
    let (key, rest) = segments.split_first()?;
    let selector = rest.first().map(|segment| match value.get(key) {
        Some(Value::Array(_)) => Selector::parse(segment),
        _ => Selector::key(segment.as_str()),
    });
    Some((key.as_str(), selector))
}
