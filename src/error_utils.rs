//! Shared error utilities

use miette::{NamedSource, SourceSpan};
use std::path::Path;

/// Toggle this to add spaces for iTerm2 clickability
const ADD_SPACES_FOR_ITERM: bool = true;

/// Format a file path for error display
///
/// When ADD_SPACES_FOR_ITERM is true, adds a space before the path
/// to make it clickable in iTerm2.
pub fn format_error_path(path: &Path) -> String {
    let path_str = path.display().to_string();

    if ADD_SPACES_FOR_ITERM {
        format!(" {path_str}")
    } else {
        path_str
    }
}

/// Create a NamedSource with proper formatting for error display
pub fn create_named_source(path: &Path, content: String) -> NamedSource<String> {
    NamedSource::new(format_error_path(path), content)
}

/// Span covering the text of a 1-based line, without its indentation.
/// Line 0 and lines past the end of the source have no span.
pub fn line_span(source: &str, line: usize) -> Option<SourceSpan> {
    let text = source.lines().nth(line.checked_sub(1)?)?;
    let start = line_to_offset(source, line - 1);
    let indent = text.len() - text.trim_start().len();
    let len = text.trim().len();
    Some(SourceSpan::new((start + indent).into(), len))
}

/// Calculate byte offset from a 0-based line number
fn line_to_offset(source: &str, target_line: usize) -> usize {
    let mut current_line = 0;

    for (idx, ch) in source.char_indices() {
        if current_line == target_line {
            return idx;
        }

        if ch == '\n' {
            current_line += 1;
        }
    }

    // If we didn't find the line, return the end of the source
    source.len()
}
