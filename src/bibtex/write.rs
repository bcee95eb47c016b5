//! BibTeX serialization.
//!
//! Renders entries back to BibTeX markup with a fixed layout: four-space
//! indent, one `field = {value}` line per field in alphabetical field order.
//! Empty placeholder values added during validation are emitted as `{}` so
//! the gaps are visible in the artifact.

use crate::Entry;
use itertools::Itertools;

/// Serialize a slice of entries, separated by blank lines.
pub fn write_entries(entries: &[Entry]) -> String {
    let mut out = String::new();
    for entry in entries {
        write_entry(entry, &mut out);
        out.push('\n');
    }
    out
}

/// Serialize a single entry into `out`.
pub fn write_entry(entry: &Entry, out: &mut String) {
    out.push('@');
    out.push_str(&entry.entry_type);
    out.push('{');
    out.push_str(&entry.key);
    out.push_str(",\n");
    for name in entry.fields.keys().sorted() {
        out.push_str("    ");
        out.push_str(name);
        out.push_str(" = {");
        out.push_str(&entry.fields[name]);
        out.push_str("},\n");
    }
    out.push_str("}\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bibtex::parse::bibtex_parse;
    use pretty_assertions::assert_eq;

    fn sample_entry() -> Entry {
        let mut entry = Entry::new("smith2020", "article");
        entry.set("title", "An Example");
        entry.set("year", "2020");
        entry.set("author", "Smith, John");
        entry
    }

    #[test]
    fn test_fields_in_alphabetical_order() {
        let mut out = String::new();
        write_entry(&sample_entry(), &mut out);
        assert_eq!(
            out,
            "@article{smith2020,\n    author = {Smith, John},\n    title = {An Example},\n    year = {2020},\n}\n"
        );
    }

    #[test]
    fn test_empty_placeholder_is_visible() {
        let mut entry = Entry::new("k", "misc");
        entry.set("howpublished", "");
        let mut out = String::new();
        write_entry(&entry, &mut out);
        assert!(out.contains("howpublished = {}"));
    }

    #[test]
    fn test_output_is_reparseable() {
        let original = vec![sample_entry()];
        let reparsed = bibtex_parse(write_entries(&original)).unwrap();
        assert_eq!(reparsed, original);
    }
}
