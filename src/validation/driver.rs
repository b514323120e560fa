use std::collections::HashSet;
use tracing::{debug, info};

use super::diagnostic::{Annotation, Diagnostic, DiagnosticKind, EntryOutcome, Finding};
use super::document::{Document, LoadError};
use super::metadata::Metadata;
use super::rules;
use super::schema::SchemaChecker;
use crate::changes::Entry;
use crate::registry::{Registry, RegistryError};

/// Outcomes of a whole run, in the order entries were checked.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<(Entry, EntryOutcome)>,
}

impl RunReport {
    pub fn checked(&self) -> usize {
        self.outcomes.len()
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.checked() - self.passed()
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.outcomes.iter().flat_map(|(_, o)| o.diagnostics())
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Runs every check against each entry. The schema and language list are
/// fetched once by the caller; published metadata is looked up per entry.
pub struct Validator<'r, R> {
    registry: &'r R,
    schema: SchemaChecker,
    languages: HashSet<String>,
}

impl<'r, R: Registry> Validator<'r, R> {
    pub fn new(
        registry: &'r R,
        schema: SchemaChecker,
        languages: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            registry,
            schema,
            languages: languages.into_iter().collect(),
        }
    }

    /// Validate entries one after another. Entry failures are collected;
    /// a registry failure aborts the run.
    pub async fn validate_entries(&self, entries: &[Entry]) -> Result<RunReport, RegistryError> {
        let mut report = RunReport::default();
        for entry in entries {
            let outcome = self.validate_entry(entry).await?;
            if outcome.is_passed() {
                info!("✓ {} passed", entry.name);
            } else {
                debug!(
                    "✗ {} failed with {} diagnostic(s)",
                    entry.name,
                    outcome.diagnostics().len()
                );
            }
            report.outcomes.push((entry.clone(), outcome));
        }
        Ok(report)
    }

    pub async fn validate_entry(&self, entry: &Entry) -> Result<EntryOutcome, RegistryError> {
        let mut findings = EntryFindings::new(entry);
        self.run_checks(entry, &mut findings).await?;
        Ok(EntryOutcome::from_diagnostics(findings.diagnostics))
    }

    /// Checks run in order and the entry ends at the first step that records
    /// a finding which [stops the entry](DiagnosticKind::stops_entry), since
    /// every later check assumes a schema-valid document.
    async fn run_checks(
        &self,
        entry: &Entry,
        findings: &mut EntryFindings<'_>,
    ) -> Result<(), RegistryError> {
        debug!("Checking {}", entry.name);

        let document = match Document::load(&entry.metadata_path()) {
            Ok(document) => document,
            Err(e) => {
                findings.push_load_error(e);
                return Ok(());
            }
        };

        findings.extend(self.schema.check(&document));
        if findings.stopped() {
            return Ok(());
        }

        let metadata: Metadata = match serde_json::from_value(document.value.clone()) {
            Ok(metadata) => metadata,
            Err(e) => {
                findings.push(Finding::new(
                    DiagnosticKind::Structural,
                    format!("metadata.json is not valid presence metadata: {e}"),
                    None,
                ));
                return Ok(());
            }
        };

        findings.extend(rules::schema_version(&document, &metadata, self.schema.id()));
        if findings.stopped() {
            return Ok(());
        }

        let published = self.registry.published(&metadata.service).await?;
        findings.extend(rules::version_bump(&document, &metadata, published.as_ref()));
        findings.extend(rules::iframe_companion(
            &document,
            &metadata,
            entry.iframe_path().is_file(),
        ));
        findings.extend(rules::languages(&document, &metadata, &self.languages));

        Ok(())
    }
}

/// Ties findings to the entry and its metadata file.
struct EntryFindings<'e> {
    entry: &'e Entry,
    diagnostics: Vec<Diagnostic>,
}

impl<'e> EntryFindings<'e> {
    fn new(entry: &'e Entry) -> Self {
        Self {
            entry,
            diagnostics: Vec::new(),
        }
    }

    fn push(&mut self, finding: Finding) {
        self.diagnostics.push(Diagnostic {
            entry: self.entry.name.clone(),
            kind: finding.kind,
            message: finding.message,
            annotation: Some(Annotation::new(self.entry.metadata_path(), finding.line)),
        });
    }

    /// A missing file has no line to point at, so it is tied to the entry
    /// only.
    fn push_load_error(&mut self, error: LoadError) {
        if let LoadError::Missing = error {
            self.diagnostics.push(Diagnostic {
                entry: self.entry.name.clone(),
                kind: DiagnosticKind::Structural,
                message: error.to_string(),
                annotation: None,
            });
        } else {
            let line = error.line();
            self.push(Finding::new(DiagnosticKind::Structural, error.to_string(), line));
        }
    }

    fn stopped(&self) -> bool {
        self.diagnostics.iter().any(|d| d.kind.stops_entry())
    }
}

impl Extend<Finding> for EntryFindings<'_> {
    fn extend<I: IntoIterator<Item = Finding>>(&mut self, iter: I) {
        for finding in iter {
            self.push(finding);
        }
    }
}
