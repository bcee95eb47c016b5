//! Rendering of the final bibliography artifacts.
//!
//! An artifact is BibTeX markup interleaved with `%`-comment diagnostic
//! blocks: entries grouped under per-type headers, venue-name discrepancies,
//! missing-field and duplicate-key reports, the booktitle/publisher/journal
//! inventories, and the per-type field coverage listing.

use crate::bibtex::write_entry;
use crate::consistency::FieldInventory;
use crate::loader::DuplicateKey;
use crate::schema::MissingFields;
use crate::Entry;
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet};

/// Diagnostic reports accumulated across the pipeline stages.
#[derive(Debug, Default)]
pub struct Diagnostics {
    /// Venue-name spelling groups from the consistency detector.
    pub discrepancies: Vec<BTreeSet<String>>,
    /// Entries that lacked required fields.
    pub missing_fields: Vec<MissingFields>,
    /// Keys dropped by the loader's first-seen-wins merge.
    pub duplicates: Vec<DuplicateKey>,
    /// Distinct booktitle/publisher/journal values.
    pub inventory: FieldInventory,
    /// Entry type to observed field names.
    pub category_fields: BTreeMap<String, BTreeSet<String>>,
}

/// Artifact filename for the used-entry collection in split layout.
pub const USED_FILENAME: &str = "used_sorted_references.bib";
/// Artifact filename for the unused-entry collection in split layout.
pub const UNUSED_FILENAME: &str = "unused_sorted_references.bib";
/// Artifact filename for the combined layout.
pub const COMBINED_FILENAME: &str = "sorted_references.bib";

/// Whether to emit one combined artifact or separate used/unused files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputLayout {
    /// Two files, each carrying its entry collection plus the shared
    /// diagnostics.
    #[default]
    Split,
    /// One file with `USED`/`UNUSED` sections.
    Combined,
}

/// Renders one entry collection followed by the diagnostics blocks.
pub fn render_report(entries: &[Entry], diagnostics: &Diagnostics) -> String {
    let mut out = String::new();
    render_grouped(entries, &mut out);
    render_diagnostics(diagnostics, &mut out);
    out
}

/// Renders used and unused collections into a single artifact.
pub fn render_combined(used: &[Entry], unused: &[Entry], diagnostics: &Diagnostics) -> String {
    let mut out = String::from("USED BIBS\n\n");
    render_grouped(used, &mut out);
    out.push_str("\n% ------below here is unused\n\nUNUSED BIBS\n\n");
    render_grouped(unused, &mut out);
    render_diagnostics(diagnostics, &mut out);
    out
}

/// Serializes entries under `% TYPE` headers. Entries are expected to be
/// sorted already, so consecutive runs share a type.
fn render_grouped(entries: &[Entry], out: &mut String) {
    let chunks = entries.iter().chunk_by(|entry| entry.entry_type.clone());
    for (entry_type, group) in &chunks {
        out.push_str("% ");
        out.push_str(&entry_type.to_uppercase());
        out.push_str("\n\n");
        for entry in group {
            write_entry(entry, out);
            out.push('\n');
        }
    }
}

fn render_diagnostics(diagnostics: &Diagnostics, out: &mut String) {
    if !diagnostics.discrepancies.is_empty() {
        out.push_str("\n% Discrepancies in booktitle/journal names:\n\n");
        for group in &diagnostics.discrepancies {
            out.push_str("% Variations found:\n");
            for variant in group {
                out.push_str(&format!("% - {variant}\n"));
            }
            out.push('\n');
        }
    }

    if !diagnostics.missing_fields.is_empty() {
        out.push_str("\n% Entries with missing required fields:\n\n");
        for item in &diagnostics.missing_fields {
            out.push_str(&format!("% Entry key: {}\n", item.key));
            out.push_str(&format!("% Entry type: {}\n", item.entry_type));
            out.push_str(&format!(
                "% Missing fields: {}\n\n",
                item.missing_fields.join(", ")
            ));
        }
    }

    if !diagnostics.duplicates.is_empty() {
        out.push_str("\n% Duplicate keys ignored at load time:\n\n");
        for duplicate in &diagnostics.duplicates {
            out.push_str(&format!("% - {} ({})\n", duplicate.key, duplicate.file));
        }
    }

    out.push_str("\n% List of booktitles:\n");
    for value in &diagnostics.inventory.booktitles {
        out.push_str(&format!("% - {value}\n"));
    }
    out.push_str("\n% List of publishers:\n");
    for value in &diagnostics.inventory.publishers {
        out.push_str(&format!("% - {value}\n"));
    }
    out.push_str("\n% List of journals:\n");
    for value in &diagnostics.inventory.journals {
        out.push_str(&format!("% - {value}\n"));
    }

    out.push_str("\n% Fields used in each category:\n");
    for (entry_type, fields) in &diagnostics.category_fields {
        out.push_str(&format!("% Entry type: {entry_type}\n"));
        out.push_str(&format!(
            "% Fields: {}\n\n",
            fields.iter().join(", ")
        ));
    }
}
