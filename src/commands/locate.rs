use anyhow::{Context, Result};
use std::path::Path;

use presence_lint::locator::{self, Selector};

/// Print the line `key` (and `selector` inside it) is declared on.
/// Returns whether anything was found.
pub fn locate_command(file: &Path, key: &str, selector: Option<&str>) -> Result<bool> {
    let text = std::fs::read_to_string(file).with_context(|| format!("Failed to read {file:?}"))?;
    let selector = selector.map(Selector::parse);

    let line = locator::locate(&text, key, selector.as_ref())
        .with_context(|| format!("{file:?} is not valid JSON"))?;

    match line {
        Some(line) if line > 0 => {
            println!("{line}");
            Ok(true)
        }
        _ => {
            println!("not found");
            Ok(false)
        }
    }
}
