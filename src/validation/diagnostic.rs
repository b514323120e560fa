use std::fmt;
use std::path::PathBuf;

/// How a failure affects the rest of the entry's checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Metadata file missing or unparseable; stops the entry.
    Structural,
    /// Schema violation or stale `$schema`; stops the entry.
    Schema,
    /// Version, iframe or language policy; the entry keeps going.
    Policy,
}

impl DiagnosticKind {
    pub fn stops_entry(self) -> bool {
        !matches!(self, DiagnosticKind::Policy)
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiagnosticKind::Structural => "structure",
            DiagnosticKind::Schema => "schema",
            DiagnosticKind::Policy => "policy",
        })
    }
}

/// Where in which file a diagnostic points. Line `0` means the whole file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub file: PathBuf,
    pub line: usize,
}

impl Annotation {
    pub fn new(file: impl Into<PathBuf>, line: Option<usize>) -> Self {
        Self {
            file: file.into(),
            line: line.unwrap_or(0),
        }
    }

    pub fn line(&self) -> Option<usize> {
        (self.line > 0).then_some(self.line)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Name of the presence the diagnostic belongs to.
    pub entry: String,
    pub kind: DiagnosticKind,
    pub message: String,
    pub annotation: Option<Annotation>,
}

/// A failed check before it is tied to an entry and file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub kind: DiagnosticKind,
    pub message: String,
    pub line: Option<usize>,
}

impl Finding {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, line: Option<usize>) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
        }
    }

    pub fn policy(message: impl Into<String>, line: Option<usize>) -> Self {
        Self::new(DiagnosticKind::Policy, message, line)
    }

    pub fn schema(message: impl Into<String>, line: Option<usize>) -> Self {
        Self::new(DiagnosticKind::Schema, message, line)
    }
}

/// Result of validating one entry. A failed entry always carries at least
/// one diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Passed,
    Failed(Vec<Diagnostic>),
}

impl EntryOutcome {
    pub fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        if diagnostics.is_empty() {
            EntryOutcome::Passed
        } else {
            EntryOutcome::Failed(diagnostics)
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, EntryOutcome::Passed)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            EntryOutcome::Passed => &[],
            EntryOutcome::Failed(diagnostics) => diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_policy_findings_let_the_entry_continue() {
        assert!(DiagnosticKind::Structural.stops_entry());
        assert!(DiagnosticKind::Schema.stops_entry());
        assert!(!DiagnosticKind::Policy.stops_entry());
    }

    #[test]
    fn test_line_zero_is_file_level() {
        assert_eq!(Annotation::new("metadata.json", Some(0)).line(), None);
        assert_eq!(Annotation::new("metadata.json", None).line(), None);
        assert_eq!(Annotation::new("metadata.json", Some(4)).line(), Some(4));
    }

    #[test]
    fn test_outcome_from_diagnostics() {
        assert!(EntryOutcome::from_diagnostics(Vec::new()).is_passed());
        let diagnostic = Diagnostic {
            entry: "Example".to_string(),
            kind: DiagnosticKind::Policy,
            message: "iframe.ts exists but iframe is not set to true".to_string(),
            annotation: None,
        };
        let outcome = EntryOutcome::from_diagnostics(vec![diagnostic.clone()]);
        assert_eq!(outcome.diagnostics(), &[diagnostic]);
    }
}
