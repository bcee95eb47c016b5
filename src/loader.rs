//! Discovery and loading of project documents and bibliography databases.
//!
//! Filesystem walk order is platform-dependent, so both discovery functions
//! sort paths lexicographically before returning them. The duplicate-key
//! merge is first-seen-wins over that defined order, which keeps the loaded
//! collection deterministic regardless of how the directory is enumerated.

use crate::bibtex::BibtexParser;
use crate::output::{COMBINED_FILENAME, UNUSED_FILENAME, USED_FILENAME};
use crate::{BibError, Entry, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A duplicate-key collision observed while merging database files.
///
/// The second-seen occurrence is dropped, never silently overwritten; one
/// item is recorded per dropped occurrence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateKey {
    /// The colliding citation key.
    pub key: String,
    /// File the dropped occurrence came from.
    pub file: String,
}

/// Result of loading a directory of bibliography databases.
#[derive(Debug, Default)]
pub struct LoadedBibliography {
    /// Merged entries, unique by key, in first-seen order.
    pub entries: Vec<Entry>,
    /// One record per dropped duplicate occurrence.
    pub duplicates: Vec<DuplicateKey>,
}

/// Recursively finds `.tex` documents under `dir`, in lexicographic order.
pub fn find_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "tex")
        {
            paths.push(entry.into_path());
        }
    }
    paths.sort();
    Ok(paths)
}

/// Reads each document to a string. Unreadable files abort the run.
pub fn read_documents(paths: &[PathBuf]) -> Result<Vec<String>> {
    paths
        .iter()
        .map(|path| {
            fs::read_to_string(path)
                .map_err(|e| BibError::in_file(path.display().to_string(), e.into()))
        })
        .collect()
}

/// Loads and merges every database file in `dir` whose name ends with
/// `suffix` (non-recursive, lexicographic file order).
///
/// The first occurrence of a key wins; every later occurrence is logged and
/// recorded in [`LoadedBibliography::duplicates`]. Unreadable or malformed
/// files are fatal.
pub fn load_bibliography(dir: &Path, suffix: &str) -> Result<LoadedBibliography> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .collect::<io::Result<Vec<_>>>()?
        .into_iter()
        .map(|dir_entry| dir_entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| {
                        // Artifacts written by a previous run are never input.
                        name.ends_with(suffix)
                            && !matches!(
                                name,
                                USED_FILENAME | UNUSED_FILENAME | COMBINED_FILENAME
                            )
                    })
        })
        .collect();
    files.sort();

    let parser = BibtexParser::new();
    let mut loaded = LoadedBibliography::default();
    let mut seen: HashSet<String> = HashSet::new();

    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let text = fs::read_to_string(&path)
            .map_err(|e| BibError::in_file(name.clone(), e.into()))?;
        let entries = parser
            .parse(&text)
            .map_err(|e| BibError::in_file(name.clone(), e))?;
        debug!("loaded {} entries from {}", entries.len(), name);

        for entry in entries {
            if seen.insert(entry.key.clone()) {
                loaded.entries.push(entry);
            } else {
                warn!(
                    "Duplicate entry key '{}' found in {}, ignoring duplicate.",
                    entry.key, name
                );
                loaded.duplicates.push(DuplicateKey {
                    key: entry.key,
                    file: name.clone(),
                });
            }
        }
    }

    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_find_documents_recurses_and_sorts() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("sections")).unwrap();
        write(tmp.path(), "zz.tex", "");
        write(&tmp.path().join("sections"), "intro.tex", "");
        write(tmp.path(), "notes.txt", "");

        let paths = find_documents(tmp.path()).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.strip_prefix(tmp.path()).unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["sections/intro.tex", "zz.tex"]);
    }

    #[test]
    fn test_first_seen_wins_across_files() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "a.bib",
            "@article{smith2020, title = {From A}}",
        );
        write(
            tmp.path(),
            "b.bib",
            "@article{smith2020, title = {From B}}\n@book{other, title = {Kept}}",
        );

        let loaded = load_bibliography(tmp.path(), ".bib").unwrap();
        assert_eq!(loaded.entries.len(), 2);
        assert_eq!(loaded.entries[0].get("title"), Some("From A"));
        assert_eq!(
            loaded.duplicates,
            vec![DuplicateKey {
                key: "smith2020".to_string(),
                file: "b.bib".to_string(),
            }]
        );
    }

    #[test]
    fn test_duplicate_within_one_file() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "refs.bib",
            "@misc{k, note = {first}}\n@misc{k, note = {second}}",
        );

        let loaded = load_bibliography(tmp.path(), ".bib").unwrap();
        assert_eq!(loaded.entries.len(), 1);
        assert_eq!(loaded.entries[0].get("note"), Some("first"));
        assert_eq!(loaded.duplicates.len(), 1);
    }

    #[test]
    fn test_suffix_filter() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "refs.bib", "@misc{a, note = {v}}");
        write(tmp.path(), "refs.bib.bak", "@misc{b, note = {v}}");

        let loaded = load_bibliography(tmp.path(), ".bib").unwrap();
        assert_eq!(loaded.entries.len(), 1);
        assert_eq!(loaded.entries[0].key, "a");
    }

    #[test]
    fn test_previous_run_artifacts_are_not_input() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "refs.bib", "@misc{a, note = {v}}");
        write(tmp.path(), USED_FILENAME, "@misc{stale, note = {v}}");
        write(tmp.path(), UNUSED_FILENAME, "@misc{staler, note = {v}}");

        let loaded = load_bibliography(tmp.path(), ".bib").unwrap();
        assert_eq!(loaded.entries.len(), 1);
        assert_eq!(loaded.entries[0].key, "a");
    }

    #[test]
    fn test_malformed_database_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "refs.bib", "@article{bad, title = {open");

        let err = load_bibliography(tmp.path(), ".bib").unwrap_err();
        assert!(err.to_string().starts_with("refs.bib:"));
    }
}
