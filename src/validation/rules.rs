//! Policy checks that run once a document is schema-valid

use semver::Version;
use std::collections::HashSet;

use super::diagnostic::Finding;
use super::document::Document;
use super::metadata::Metadata;
use crate::config::INITIAL_VERSION;
use crate::locator::Selector;
use crate::registry::PublishedMetadata;

/// `$schema` must name the latest schema.
pub fn schema_version(document: &Document, metadata: &Metadata, latest: &str) -> Option<Finding> {
    if metadata.schema.as_deref() == Some(latest) {
        return None;
    }
    let message = match &metadata.schema {
        Some(declared) => format!("$schema is outdated: found {declared}, expected {latest}"),
        None => format!("$schema is missing, expected {latest}"),
    };
    Some(Finding::schema(message, document.line_of("$schema", None)))
}

/// A published presence must bump its version; a new one starts at 1.0.0.
pub fn version_bump(
    document: &Document,
    metadata: &Metadata,
    published: Option<&PublishedMetadata>,
) -> Option<Finding> {
    let line = document.line_of("version", None);

    let Some(published) = published else {
        if metadata.version == INITIAL_VERSION {
            return None;
        }
        return Some(Finding::policy(
            format!(
                "New presences must start at version {INITIAL_VERSION}, found {}",
                metadata.version
            ),
            line,
        ));
    };

    let current = match Version::parse(&metadata.version) {
        Ok(version) => version,
        Err(e) => {
            return Some(Finding::policy(
                format!("Version {} is not a semantic version: {e}", metadata.version),
                line,
            ));
        }
    };
    let previous = match Version::parse(&published.version) {
        Ok(version) => version,
        Err(e) => {
            return Some(Finding::policy(
                format!(
                    "Published version {} cannot be compared: {e}",
                    published.version
                ),
                line,
            ));
        }
    };

    if current > previous {
        None
    } else {
        Some(Finding::policy(
            format!(
                "Version has not been bumped: {current} must be greater than the published {previous}"
            ),
            line,
        ))
    }
}

/// `iframe.ts` must exist exactly when the metadata asks for it.
pub fn iframe_companion(
    document: &Document,
    metadata: &Metadata,
    iframe_present: bool,
) -> Option<Finding> {
    let line = document.line_of("iframe", None);
    match (metadata.wants_iframe(), iframe_present) {
        (true, false) => Some(Finding::policy(
            "iframe is set to true but iframe.ts does not exist",
            line,
        )),
        (false, true) => Some(Finding::policy(
            "iframe.ts exists but iframe is not set to true",
            line,
        )),
        _ => None,
    }
}

/// One finding per description language the registry does not know.
pub fn languages(
    document: &Document,
    metadata: &Metadata,
    known: &HashSet<String>,
) -> Vec<Finding> {
    metadata
        .languages()
        .filter(|tag| !known.contains(*tag))
        .map(|tag| {
            Finding::policy(
                format!("\"{tag}\" is not a supported language"),
                document.line_of("description", Some(&Selector::key(tag))),
            )
        })
        .collect()
}
