//! Read-only consistency diagnostics over a loaded collection.
//!
//! Venue-name discrepancy detection groups booktitle/journal spellings by a
//! canonical form (lowercased, trimmed, periods and commas stripped); any
//! group with more than one distinct original spelling likely denotes the
//! same publication written inconsistently.

use crate::Entry;
use std::collections::{BTreeMap, BTreeSet};

/// Distinct booktitle, publisher, and journal values seen across all entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldInventory {
    pub booktitles: BTreeSet<String>,
    pub publishers: BTreeSet<String>,
    pub journals: BTreeSet<String>,
}

/// Finds venue-name spellings that normalize to the same canonical form.
///
/// Per entry, `booktitle` is considered if present, else `journal`, else the
/// entry is skipped. Groups are ordered by their canonical form so the
/// output is deterministic. Entries are never mutated.
pub fn venue_discrepancies(entries: &[Entry]) -> Vec<BTreeSet<String>> {
    let mut variations: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for entry in entries {
        let Some(name) = entry.get("booktitle").or_else(|| entry.get("journal")) else {
            continue;
        };
        variations
            .entry(normalize_venue(name))
            .or_default()
            .insert(name.to_string());
    }
    variations
        .into_values()
        .filter(|originals| originals.len() > 1)
        .collect()
}

/// Lowercase, trim, strip periods and commas.
fn normalize_venue(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '.' | ','))
        .collect()
}

/// Collects the distinct booktitle, publisher, and journal values.
pub fn field_inventory(entries: &[Entry]) -> FieldInventory {
    let mut inventory = FieldInventory::default();
    for entry in entries {
        if let Some(value) = entry.get("booktitle") {
            inventory.booktitles.insert(value.to_string());
        }
        if let Some(value) = entry.get("publisher") {
            inventory.publishers.insert(value.to_string());
        }
        if let Some(value) = entry.get("journal") {
            inventory.journals.insert(value.to_string());
        }
    }
    inventory
}

/// Maps each entry type to the set of field names observed on entries of
/// that type.
pub fn category_field_index(entries: &[Entry]) -> BTreeMap<String, BTreeSet<String>> {
    let mut index: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for entry in entries {
        index
            .entry(entry.entry_type.clone())
            .or_default()
            .extend(entry.fields.keys().cloned());
    }
    index
}

/// Backfills every entry with empty placeholders for fields present on some
/// sibling of the same type, guaranteeing uniform shape within a type.
pub fn unify_entry_fields(
    entries: Vec<Entry>,
    index: &BTreeMap<String, BTreeSet<String>>,
) -> Vec<Entry> {
    entries
        .into_iter()
        .map(|mut entry| {
            if let Some(fields) = index.get(&entry.entry_type) {
                for field in fields {
                    if !entry.has(field) {
                        entry.set(field.clone(), "");
                    }
                }
            }
            entry
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn with_field(key: &str, entry_type: &str, field: &str, value: &str) -> Entry {
        let mut entry = Entry::new(key, entry_type);
        entry.set(field, value);
        entry
    }

    #[test]
    fn test_punctuation_and_case_variants_grouped() {
        let entries = vec![
            with_field("a", "inproceedings", "booktitle", "CHI '24."),
            with_field("b", "inproceedings", "booktitle", "chi '24"),
            with_field("c", "inproceedings", "booktitle", "CHI '24"),
        ];
        let groups = venue_discrepancies(&entries);
        assert_eq!(groups.len(), 1);
        let expected: BTreeSet<String> = ["CHI '24.", "chi '24", "CHI '24"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(groups[0], expected);
    }

    #[test]
    fn test_consistent_names_not_reported() {
        let entries = vec![
            with_field("a", "article", "journal", "Nature"),
            with_field("b", "article", "journal", "Nature"),
        ];
        assert!(venue_discrepancies(&entries).is_empty());
    }

    #[test]
    fn test_booktitle_shadows_journal() {
        let mut entry = with_field("a", "inproceedings", "booktitle", "Proc. CHI");
        entry.set("journal", "CHI");
        let other = with_field("b", "article", "journal", "chi");

        // The first entry contributes its booktitle, not its journal, so the
        // journal variants cannot form a group with it.
        let groups = venue_discrepancies(&[entry, other]);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_field_inventory() {
        let mut a = with_field("a", "inproceedings", "booktitle", "CHI");
        a.set("publisher", "ACM");
        let b = with_field("b", "article", "journal", "Nature");

        let inventory = field_inventory(&[a, b]);
        assert_eq!(inventory.booktitles.len(), 1);
        assert_eq!(inventory.publishers.len(), 1);
        assert_eq!(inventory.journals.len(), 1);
    }

    #[test]
    fn test_category_field_index() {
        let a = with_field("a", "article", "journal", "Nature");
        let b = with_field("b", "article", "volume", "7");

        let index = category_field_index(&[a, b]);
        let expected: BTreeSet<String> = ["journal", "volume"].iter().map(|s| s.to_string()).collect();
        assert_eq!(index["article"], expected);
    }

    #[test]
    fn test_unify_entry_fields_backfills_siblings() {
        let a = with_field("a", "article", "journal", "Nature");
        let b = with_field("b", "article", "volume", "7");
        let entries = vec![a, b];

        let index = category_field_index(&entries);
        let entries = unify_entry_fields(entries, &index);
        assert_eq!(entries[0].get("volume"), Some(""));
        assert_eq!(entries[1].get("journal"), Some(""));
        // Original values are untouched.
        assert_eq!(entries[0].get("journal"), Some("Nature"));
    }
}
