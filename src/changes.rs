//! Discovery of the catalog entries a change touches

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

pub const METADATA_FILE: &str = "metadata.json";
pub const IFRAME_FILE: &str = "iframe.ts";

/// One presence directory, `<catalog>/<group>/<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    pub name: String,
    pub dir: PathBuf,
}

impl Entry {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.display().to_string());
        Self { name, dir }
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.dir.join(METADATA_FILE)
    }

    pub fn iframe_path(&self) -> PathBuf {
        self.dir.join(IFRAME_FILE)
    }
}

/// Map changed file paths to the entries containing them, in first-seen
/// order. Paths outside the catalog are ignored, as are entries whose
/// directory no longer exists (removed presences).
pub fn entries_from_changes(catalog: &Path, changed: &[PathBuf]) -> Vec<Entry> {
    let catalog = normalize(catalog);
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for path in changed {
        let path = normalize(path);
        let Ok(rest) = path.strip_prefix(&catalog) else {
            debug!("Ignoring {path:?}: outside of {catalog:?}");
            continue;
        };

        let mut parts = rest.components().filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        });
        let (Some(group), Some(name)) = (parts.next(), parts.next()) else {
            debug!("Ignoring {path:?}: not inside an entry directory");
            continue;
        };

        let dir = catalog.join(group).join(name);
        if !seen.insert(dir.clone()) {
            continue;
        }
        if !dir.is_dir() {
            warn!("Skipping {dir:?}: entry directory no longer exists");
            continue;
        }
        entries.push(Entry::new(dir));
    }

    entries
}

/// Every entry directory in the catalog, sorted by path.
pub fn scan_catalog(catalog: &Path) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for dent in WalkDir::new(catalog)
        .min_depth(2)
        .max_depth(2)
        .sort_by_file_name()
    {
        let dent = dent.with_context(|| format!("Failed to scan catalog {catalog:?}"))?;
        if dent.file_type().is_dir() {
            entries.push(Entry::new(dent.into_path()));
        }
    }
    Ok(entries)
}

/// Parse a newline separated list of changed paths.
pub fn parse_changed_list(contents: &str) -> Vec<PathBuf> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn catalog() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for entry in ["websites/A/Amazon", "websites/N/Netflix", "websites/Y/YouTube"] {
            fs::create_dir_all(dir.path().join(entry)).unwrap();
        }
        dir
    }

    #[test]
    fn test_entry_paths() {
        let entry = Entry::new("websites/A/Amazon");
        assert_eq!(entry.name, "Amazon");
        assert_eq!(entry.metadata_path(), PathBuf::from("websites/A/Amazon/metadata.json"));
        assert_eq!(entry.iframe_path(), PathBuf::from("websites/A/Amazon/iframe.ts"));
    }

    #[test]
    fn test_changes_map_to_unique_entries_in_order() {
        let root = catalog();
        let websites = root.path().join("websites");
        let changed = vec![
            websites.join("N/Netflix/presence.ts"),
            websites.join("A/Amazon/metadata.json"),
            websites.join("N/Netflix/metadata.json"),
            root.path().join("README.md"),
            websites.join("A"),
        ];

        let entries = entries_from_changes(&websites, &changed);
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Netflix", "Amazon"]);
    }

    #[test]
    fn test_deleted_entries_are_skipped() {
        let root = catalog();
        let websites = root.path().join("websites");
        let changed = vec![websites.join("G/Gone/metadata.json")];
        assert!(entries_from_changes(&websites, &changed).is_empty());
    }

    #[test]
    fn test_current_dir_prefix_is_ignored() {
        let changed = vec![PathBuf::from("./websites/A/Amazon/metadata.json")];
        let entries = entries_from_changes(Path::new("websites"), &changed);
        // The directory does not exist relative to the test's working directory.
        assert!(entries.is_empty());
        assert_eq!(
            normalize(Path::new("./websites/A/Amazon")),
            PathBuf::from("websites/A/Amazon")
        );
    }

    #[test]
    fn test_scan_catalog_is_sorted() {
        let root = catalog();
        fs::write(root.path().join("websites/A/notes.txt"), "").unwrap();
        let entries = scan_catalog(&root.path().join("websites")).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Amazon", "Netflix", "YouTube"]);
    }

    #[test]
    fn test_parse_changed_list() {
        let paths = parse_changed_list("websites/A/Amazon/metadata.json\n\n  README.md \n");
        assert_eq!(
            paths,
            vec![
                PathBuf::from("websites/A/Amazon/metadata.json"),
                PathBuf::from("README.md")
            ]
        );
    }
}
