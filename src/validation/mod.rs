//! Validation of catalog entries
//!
//! Each entry produces an [`EntryOutcome`]; the [`Validator`] collects them
//! into a [`RunReport`] without ever stopping at a failed entry.

mod diagnostic;
mod document;
mod driver;
mod metadata;
mod rules;
mod schema;


pub use diagnostic::{Annotation, Diagnostic, DiagnosticKind, EntryOutcome, Finding};
pub use document::{Document, LoadError};
pub use driver::{RunReport, Validator};
pub use metadata::Metadata;
pub use schema::{SchemaChecker, SchemaCompileError};
