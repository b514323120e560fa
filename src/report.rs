//! Rendering of diagnostics for people and for CI annotations

use colored::Colorize;
use miette::{Diagnostic as MietteDiagnostic, NamedSource, Report, SourceSpan};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::error_utils::{create_named_source, line_span};
use crate::validation::{Diagnostic, DiagnosticKind, RunReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Annotated source snippets
    #[default]
    Human,
    /// GitHub Actions workflow commands
    Github,
}

/// A [`Diagnostic`] rendered through miette, with the offending line
/// highlighted when it is known.
#[derive(Error, Debug, MietteDiagnostic)]
#[error("{entry}: {message}")]
pub struct DiagnosticReport {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: Option<SourceSpan>,

    #[help]
    help: Option<String>,

    entry: String,
    message: String,
}

impl DiagnosticReport {
    pub fn new(diagnostic: &Diagnostic, source: Option<&str>) -> Self {
        let (src, span) = match (&diagnostic.annotation, source) {
            (Some(annotation), Some(source)) => (
                create_named_source(&annotation.file, source.to_string()),
                annotation.line().and_then(|line| line_span(source, line)),
            ),
            (Some(annotation), None) => {
                (create_named_source(&annotation.file, String::new()), None)
            }
            (None, _) => (NamedSource::new(diagnostic.entry.clone(), String::new()), None),
        };

        Self {
            src,
            span,
            help: help_for(diagnostic.kind),
            entry: diagnostic.entry.clone(),
            message: diagnostic.message.clone(),
        }
    }
}

fn help_for(kind: DiagnosticKind) -> Option<String> {
    match kind {
        DiagnosticKind::Structural => {
            Some("every presence needs a metadata.json containing valid JSON".to_string())
        }
        DiagnosticKind::Schema => Some(
            "fix schema errors first; version and language checks only run on schema-valid metadata"
                .to_string(),
        ),
        DiagnosticKind::Policy => None,
    }
}

/// Write every diagnostic of the run in the requested format.
pub fn render(report: &RunReport, format: OutputFormat, out: &mut impl Write) -> io::Result<()> {
    match format {
        OutputFormat::Human => render_human(report, out),
        OutputFormat::Github => render_github(report, out),
    }
}

fn render_human(report: &RunReport, out: &mut impl Write) -> io::Result<()> {
    let mut sources: HashMap<PathBuf, Option<String>> = HashMap::new();

    for diagnostic in report.diagnostics() {
        let source = diagnostic.annotation.as_ref().and_then(|annotation| {
            sources
                .entry(annotation.file.clone())
                .or_insert_with(|| std::fs::read_to_string(&annotation.file).ok())
                .clone()
        });
        let rendered = DiagnosticReport::new(diagnostic, source.as_deref());
        writeln!(out)?;
        writeln!(out, "{:?}", Report::new(rendered))?;
    }

    writeln!(out)?;
    writeln!(out, "{}", summary(report))
}

fn render_github(report: &RunReport, out: &mut impl Write) -> io::Result<()> {
    for diagnostic in report.diagnostics() {
        writeln!(out, "{}", github_annotation(diagnostic))?;
    }
    Ok(())
}

/// One-line result of the run.
pub fn summary(report: &RunReport) -> String {
    if report.is_success() {
        format!("✅ All {} presence(s) passed validation", report.checked())
            .green()
            .to_string()
    } else {
        format!(
            "❌ {} of {} presence(s) failed validation ({} problem(s))",
            report.failed(),
            report.checked(),
            report.diagnostics().count()
        )
        .red()
        .to_string()
    }
}

/// `::error file=..,line=..,title=..::message`. Line-less annotations
/// point at the whole file.
pub fn github_annotation(diagnostic: &Diagnostic) -> String {
    let mut properties = Vec::new();
    if let Some(annotation) = &diagnostic.annotation {
        properties.push(format!("file={}", escape_property(&path_string(&annotation.file))));
        if let Some(line) = annotation.line() {
            properties.push(format!("line={line}"));
        }
    }
    properties.push(format!("title={}", escape_property(&diagnostic.entry)));

    format!(
        "::error {}::{}",
        properties.join(","),
        escape_data(&diagnostic.message)
    )
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::Entry;
    use crate::validation::{Annotation, EntryOutcome};

    fn diagnostic(line: Option<usize>) -> Diagnostic {
        Diagnostic {
            entry: "Example".to_string(),
            kind: DiagnosticKind::Policy,
            message: "Version has not been bumped: 1.0.0 must be greater than the published 1.0.0"
                .to_string(),
            annotation: Some(Annotation::new("websites/E/Example/metadata.json", line)),
        }
    }

    #[test]
    fn test_github_annotation_with_line() {
        assert_eq!(
            github_annotation(&diagnostic(Some(4))),
            "::error file=websites/E/Example/metadata.json,line=4,title=Example::Version has not been bumped: 1.0.0 must be greater than the published 1.0.0"
        );
    }

    #[test]
    fn test_github_annotation_without_line_is_file_only() {
        let line = github_annotation(&diagnostic(Some(0)));
        assert!(line.starts_with("::error file=websites/E/Example/metadata.json,title=Example::"));
    }

    #[test]
    fn test_github_annotation_without_file() {
        let mut d = diagnostic(None);
        d.annotation = None;
        d.message = "metadata.json is missing\nsecond line".to_string();
        assert_eq!(
            github_annotation(&d),
            "::error title=Example::metadata.json is missing%0Asecond line"
        );
    }

    #[test]
    fn test_property_escaping() {
        assert_eq!(escape_property("a:b,c%"), "a%3Ab%2Cc%25");
    }

    #[test]
    fn test_report_carries_span_for_known_line() {
        let source = "{\n  \"version\": \"1.0.0\"\n}";
        let report = DiagnosticReport::new(&diagnostic(Some(2)), Some(source));
        assert_eq!(report.span.map(|s| s.offset()), Some(4));

        let report = DiagnosticReport::new(&diagnostic(Some(0)), Some(source));
        assert!(report.span.is_none());
    }

    #[test]
    fn test_render_github_lists_every_diagnostic() {
        let report = RunReport {
            outcomes: vec![
                (
                    Entry::new("websites/E/Example"),
                    EntryOutcome::Failed(vec![diagnostic(Some(4)), diagnostic(None)]),
                ),
                (Entry::new("websites/O/Other"), EntryOutcome::Passed),
            ],
        };
        let mut out = Vec::new();
        render(&report, OutputFormat::Github, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_render_human_includes_messages_and_summary() {
        colored::control::set_override(false);
        let report = RunReport {
            outcomes: vec![(
                Entry::new("websites/E/Example"),
                EntryOutcome::Failed(vec![diagnostic(Some(4))]),
            )],
        };
        let mut out = Vec::new();
        render(&report, OutputFormat::Human, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Version has not been bumped"));
        assert!(text.contains("1 of 1 presence(s) failed validation"));
    }
}
