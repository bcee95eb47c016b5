//! Venue profiles and required-field validation.
//!
//! A venue profile maps entry types to an ordered list of required field
//! names. The tables are immutable data selected once per run; they are
//! passed into the validator explicitly rather than read from globals.
//!
//! `misc` entries that mention "arxiv" anywhere in their field values are
//! validated against the venue's `arxiv` sub-profile when it defines one.
//! The reclassification is a lookup-time decision; the stored entry type is
//! never changed.

use crate::{BibError, Entry};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

type FieldTable = &'static [(&'static str, &'static [&'static str])];

const GENERIC_TABLE: FieldTable = &[
    ("article", &["author", "title", "journal", "year", "doi"]),
    ("inproceedings", &["author", "title", "booktitle", "year", "doi"]),
    ("proceedings", &["editor", "title", "year"]),
    ("book", &["author", "title", "publisher", "year"]),
    ("misc", &["author", "title", "howpublished", "year"]),
];

const CVPR_TABLE: FieldTable = &[
    ("article", &["author", "title", "journal", "year"]),
    ("inproceedings", &["author", "title", "booktitle", "year"]),
    ("book", &["author", "title", "publisher", "year"]),
    ("misc", &["author", "title", "year", "howpublished"]),
    ("arxiv", &["author", "title", "journal", "year"]),
];

const CHI_TABLE: FieldTable = &[
    (
        "article",
        &["author", "title", "journal", "volume", "number", "year", "address", "publisher"],
    ),
    (
        "inproceedings",
        &["author", "title", "booktitle", "year", "address", "publisher", "pages"],
    ),
    ("book", &["author", "title", "year", "address", "publisher"]),
    ("misc", &["author", "title", "howpublished", "year"]),
    ("arxiv", &["author", "title", "journal", "year"]),
];

/// Publication venues with known required-field tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Venue {
    /// Venue-agnostic profile; the only one requiring DOIs and the only one
    /// covering `proceedings` entries. Carries no arXiv sub-profile.
    #[default]
    Generic,
    Cvpr,
    Chi,
}

impl Venue {
    /// Every supported venue, for CLI help and selector validation.
    pub const ALL: [Venue; 3] = [Venue::Generic, Venue::Cvpr, Venue::Chi];

    /// The selector name accepted by [`Venue::from_str`].
    pub fn name(&self) -> &'static str {
        match self {
            Venue::Generic => "generic",
            Venue::Cvpr => "cvpr",
            Venue::Chi => "chi",
        }
    }

    fn table(&self) -> FieldTable {
        match self {
            Venue::Generic => GENERIC_TABLE,
            Venue::Cvpr => CVPR_TABLE,
            Venue::Chi => CHI_TABLE,
        }
    }

    /// The ordered required-field list for an entry type, if the venue
    /// defines one.
    pub fn required_fields(&self, entry_type: &str) -> Option<&'static [&'static str]> {
        self.table()
            .iter()
            .find(|(candidate, _)| *candidate == entry_type)
            .map(|(_, fields)| *fields)
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Venue {
    type Err = BibError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "generic" => Ok(Venue::Generic),
            "cvpr" => Ok(Venue::Cvpr),
            "chi" => Ok(Venue::Chi),
            other => Err(BibError::UnknownVenue(other.to_string())),
        }
    }
}

/// How the validator treats fields outside the required list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Keep extra fields; only backfill missing required ones.
    #[default]
    Permissive,
    /// Remove every field not in the required list, then backfill.
    Strict,
}

/// Report item for an entry that lacked one or more required fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingFields {
    /// Citation key of the flagged entry.
    pub key: String,
    /// Stored entry type (never the arXiv reclassification).
    pub entry_type: String,
    /// Backfilled fields, in profile order.
    pub missing_fields: Vec<String>,
}

/// Whether any field value mentions arXiv.
fn is_arxiv(entry: &Entry) -> bool {
    entry
        .fields
        .values()
        .any(|value| value.to_lowercase().contains("arxiv"))
}

/// Validates one entry against the venue profile, consuming and returning it.
///
/// Missing required fields are backfilled with empty placeholders and
/// appended to `report` as one [`MissingFields`] item. Entry types absent
/// from the venue table pass through untouched. Never fails.
pub fn validate(
    mut entry: Entry,
    venue: Venue,
    strictness: Strictness,
    report: &mut Vec<MissingFields>,
) -> Entry {
    let lookup_type = if entry.entry_type == "misc"
        && is_arxiv(&entry)
        && venue.required_fields("arxiv").is_some()
    {
        "arxiv"
    } else {
        entry.entry_type.as_str()
    };
    let Some(required) = venue.required_fields(lookup_type) else {
        return entry;
    };

    if strictness == Strictness::Strict {
        entry
            .fields
            .retain(|name, _| required.contains(&name.as_str()));
    }

    let mut missing = Vec::new();
    for &field in required {
        if !entry.has(field) {
            entry.set(field, "");
            missing.push(field.to_string());
        }
    }
    if !missing.is_empty() {
        report.push(MissingFields {
            key: entry.key.clone(),
            entry_type: entry.entry_type.clone(),
            missing_fields: missing,
        });
    }

    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn article(key: &str) -> Entry {
        let mut entry = Entry::new(key, "article");
        entry.set("author", "Smith, John");
        entry.set("title", "An Example");
        entry
    }

    #[test]
    fn test_unknown_selector_rejected() {
        let err = "neurips".parse::<Venue>().unwrap_err();
        assert!(matches!(err, BibError::UnknownVenue(name) if name == "neurips"));
    }

    #[test]
    fn test_selector_roundtrip() {
        for venue in Venue::ALL {
            assert_eq!(venue.name().parse::<Venue>().unwrap(), venue);
        }
    }

    #[test]
    fn test_missing_fields_reported_in_profile_order() {
        let mut report = Vec::new();
        let entry = validate(article("smith2020"), Venue::Cvpr, Strictness::Permissive, &mut report);

        assert_eq!(entry.get("journal"), Some(""));
        assert_eq!(entry.get("year"), Some(""));
        assert_eq!(
            report,
            vec![MissingFields {
                key: "smith2020".to_string(),
                entry_type: "article".to_string(),
                missing_fields: vec!["journal".to_string(), "year".to_string()],
            }]
        );
    }

    #[test]
    fn test_complete_entry_not_reported() {
        let mut entry = article("smith2020");
        entry.set("journal", "Nature");
        entry.set("year", "2020");

        let mut report = Vec::new();
        validate(entry, Venue::Cvpr, Strictness::Permissive, &mut report);
        assert!(report.is_empty());
    }

    #[test]
    fn test_strict_removes_extra_fields() {
        let mut entry = article("smith2020");
        entry.set("journal", "Nature");
        entry.set("year", "2020");
        entry.set("abstract", "Long text");
        entry.set("url", "https://example.com");

        let mut report = Vec::new();
        let entry = validate(entry, Venue::Cvpr, Strictness::Strict, &mut report);
        assert!(!entry.has("abstract"));
        assert!(!entry.has("url"));
        assert!(entry.has("journal"));
        assert!(report.is_empty());
    }

    #[test]
    fn test_permissive_keeps_extra_fields() {
        let mut entry = article("smith2020");
        entry.set("journal", "Nature");
        entry.set("year", "2020");
        entry.set("abstract", "Long text");

        let mut report = Vec::new();
        let entry = validate(entry, Venue::Cvpr, Strictness::Permissive, &mut report);
        assert!(entry.has("abstract"));
    }

    #[test]
    fn test_arxiv_reclassification() {
        let mut entry = Entry::new("park2022", "misc");
        entry.set("author", "Park, Chris");
        entry.set("title", "A Survey");
        entry.set("howpublished", "arXiv preprint");
        entry.set("year", "2022");

        let mut report = Vec::new();
        let entry = validate(entry, Venue::Cvpr, Strictness::Permissive, &mut report);

        // The arxiv profile requires journal, the misc profile does not.
        assert_eq!(entry.get("journal"), Some(""));
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].entry_type, "misc");
        assert_eq!(report[0].missing_fields, vec!["journal".to_string()]);
    }

    #[test]
    fn test_arxiv_falls_back_without_sub_profile() {
        let mut entry = Entry::new("park2022", "misc");
        entry.set("author", "Park, Chris");
        entry.set("title", "A Survey");
        entry.set("howpublished", "arXiv preprint");
        entry.set("year", "2022");

        let mut report = Vec::new();
        let entry = validate(entry, Venue::Generic, Strictness::Permissive, &mut report);

        // Generic has no arxiv sub-profile, so the misc list applies and the
        // entry is already complete.
        assert!(!entry.has("journal"));
        assert!(report.is_empty());
    }

    #[test]
    fn test_unlisted_type_passes_through() {
        let mut entry = Entry::new("conf", "proceedings");
        entry.set("title", "Proc. of Things");

        let mut report = Vec::new();
        let entry = validate(entry, Venue::Cvpr, Strictness::Strict, &mut report);
        assert!(entry.has("title"));
        assert!(report.is_empty());
    }
}
