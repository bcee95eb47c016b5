//! Partitioning into used/unused sets and deterministic presentation order.

use crate::Entry;
use either::{Left, Right};
use itertools::Itertools;
use std::collections::BTreeSet;

/// Presentation priority for entry types; remaining types follow in
/// lexicographic order.
const TYPE_ORDER: &[&str] = &["inproceedings", "article", "proceedings", "book", "misc"];

/// Splits entries into (used, unused) by citation-key membership.
pub fn split(entries: Vec<Entry>, cited_keys: &BTreeSet<String>) -> (Vec<Entry>, Vec<Entry>) {
    entries.into_iter().partition_map(|entry| {
        if cited_keys.contains(&entry.key) {
            Left(entry)
        } else {
            Right(entry)
        }
    })
}

fn type_rank(entry_type: &str) -> usize {
    TYPE_ORDER
        .iter()
        .position(|candidate| *candidate == entry_type)
        .unwrap_or(TYPE_ORDER.len())
}

/// Orders entries by (type priority, type name, lowercased title).
///
/// Missing titles sort as the empty string, first within their type group.
/// The sort is stable, so entries with identical lowercased titles keep
/// their original relative order.
pub fn sort_entries(mut entries: Vec<Entry>) -> Vec<Entry> {
    entries.sort_by_cached_key(|entry| {
        (
            type_rank(&entry.entry_type),
            entry.entry_type.clone(),
            entry.get("title").unwrap_or("").to_lowercase(),
        )
    });
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(key: &str, entry_type: &str, title: Option<&str>) -> Entry {
        let mut entry = Entry::new(key, entry_type);
        if let Some(title) = title {
            entry.set("title", title);
        }
        entry
    }

    #[test]
    fn test_split_is_exact_partition() {
        let entries = vec![
            entry("a", "article", None),
            entry("b", "article", None),
            entry("c", "book", None),
        ];
        let cited: BTreeSet<String> = ["a", "c", "phantom"].iter().map(|s| s.to_string()).collect();

        let (used, unused) = split(entries.clone(), &cited);
        assert_eq!(used.len() + unused.len(), entries.len());
        assert!(used.iter().all(|e| cited.contains(&e.key)));
        assert!(unused.iter().all(|e| !cited.contains(&e.key)));
        assert_eq!(used.iter().map(|e| e.key.as_str()).collect::<Vec<_>>(), ["a", "c"]);
        assert_eq!(unused[0].key, "b");
    }

    #[test]
    fn test_type_priority_order() {
        let entries = vec![
            entry("m", "misc", Some("M")),
            entry("z", "zebra", Some("Z")),
            entry("i", "inproceedings", Some("I")),
            entry("x", "xref", Some("X")),
            entry("a", "article", Some("A")),
            entry("b", "book", Some("B")),
            entry("p", "proceedings", Some("P")),
        ];
        let sorted = sort_entries(entries);
        let types: Vec<_> = sorted.iter().map(|e| e.entry_type.as_str()).collect();
        assert_eq!(
            types,
            ["inproceedings", "article", "proceedings", "book", "misc", "xref", "zebra"]
        );
    }

    #[test]
    fn test_titles_sorted_case_insensitively() {
        let entries = vec![
            entry("b", "article", Some("zebra patterns")),
            entry("a", "article", Some("Alpha Waves")),
            entry("c", "article", Some("beta Tests")),
        ];
        let sorted = sort_entries(entries);
        let keys: Vec<_> = sorted.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["a", "c", "b"]);
    }

    #[test]
    fn test_missing_title_sorts_first() {
        let entries = vec![
            entry("titled", "article", Some("Anything")),
            entry("untitled", "article", None),
        ];
        let sorted = sort_entries(entries);
        assert_eq!(sorted[0].key, "untitled");
    }

    #[test]
    fn test_sorting_is_idempotent_and_stable() {
        let entries = vec![
            entry("second", "article", Some("Same Title")),
            entry("first", "article", Some("same title")),
            entry("book", "book", Some("A Book")),
        ];
        let once = sort_entries(entries);
        let twice = sort_entries(once.clone());
        assert_eq!(once, twice);
        // Identical lowercased titles keep their original relative order.
        assert_eq!(once[0].key, "second");
        assert_eq!(once[1].key, "first");
    }
}
