//! A library for reconciling LaTeX citations against BibTeX bibliography databases.
//!
//! `bibtidy` scans a project's `.tex` sources for citation keys, loads every
//! entry from the project's `.bib` files, and produces cleaned bibliography
//! artifacts: entries are deduplicated by key, title and author formatting is
//! normalized, required fields are validated against a publication-venue
//! profile, and the result is split into cited (used) and uncited (unused)
//! collections, each deterministically sorted and annotated with diagnostics.
//!
//! # Key Features
//!
//! - **Citation reconciliation**: Match `\cite{...}` keys in documents against
//!   bibliography entries and partition the database into used/unused sets.
//! - **Normalization**: Title casing that leaves LaTeX commands and brace
//!   groups untouched, plus optional `"Last, First"` author standardization.
//! - **Venue validation**: Per-venue required-field tables (with an arXiv
//!   sub-profile for preprints) producing a missing-field report, in either a
//!   strict or a permissive mode.
//! - **Consistency diagnostics**: Detection of booktitle/journal spellings
//!   that differ only in punctuation or case.
//! - **Deterministic output**: Grouped, title-sorted serialization that is
//!   independent of filesystem walk order.
//!
//! # Basic Usage
//!
//! ```no_run
//! use bibtidy::pipeline::{Pipeline, PipelineConfig};
//! use bibtidy::schema::Venue;
//!
//! let config = PipelineConfig {
//!     venue: Venue::Chi,
//!     ..Default::default()
//! };
//!
//! let summary = Pipeline::new(config).run("path/to/project".as_ref()).unwrap();
//! for path in &summary.output_paths {
//!     println!("wrote {}", path.display());
//! }
//! ```
//!
//! # Error Handling
//!
//! The library uses a custom [`Result`] type that wraps [`BibError`] for
//! consistent error handling across all operations. Duplicate citation keys
//! and missing required fields are diagnostics, not errors; only unreadable
//! files, malformed BibTeX, and unknown venue selectors abort a run.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

pub mod bibtex;
pub mod consistency;
pub mod extract;
pub mod loader;
pub mod normalize;
pub mod output;
pub mod partition;
pub mod pipeline;
mod regex;
pub mod schema;

// Reexports
pub use bibtex::BibtexParser;
pub use pipeline::{Pipeline, PipelineConfig};
pub use schema::{Strictness, Venue};

/// A specialized Result type for bibliography operations.
pub type Result<T> = std::result::Result<T, BibError>;

/// Represents errors that can occur while processing a bibliography project.
#[derive(Error, Debug)]
pub enum BibError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("{path}: {source}")]
    InFile {
        path: String,
        #[source]
        source: Box<BibError>,
    },

    #[error("Unknown venue profile: {0}")]
    UnknownVenue(String),
}

impl BibError {
    /// Creates a syntax error anchored to a 1-based line number.
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        BibError::Syntax {
            line,
            message: message.into(),
        }
    }

    /// Wraps an error with the path of the file it occurred in.
    pub(crate) fn in_file(path: impl Into<String>, source: BibError) -> Self {
        BibError::InFile {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

/// A single bibliography entry: a citation key, an entry type, and a mapping
/// from field name to field value.
///
/// The key is the stable identifier matched against citation markers; the
/// entry type (`article`, `inproceedings`, ...) selects which venue-profile
/// required-field list applies. The entry type is lowercase-normalized at
/// construction; the key is kept verbatim and matched case-sensitively, as
/// LaTeX does.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique citation key, e.g. `smith2020`.
    pub key: String,
    /// Lowercased entry type tag, e.g. `article`.
    pub entry_type: String,
    /// Field name to field value.
    pub fields: HashMap<String, String>,
}

impl Entry {
    /// Creates an empty entry with the given key and (lowercased) type.
    #[must_use]
    pub fn new(key: impl Into<String>, entry_type: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entry_type: entry_type.into().to_lowercase(),
            fields: HashMap::new(),
        }
    }

    /// Returns the value of a field, if present.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Sets a field value, replacing any previous value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Whether the entry has a value for the given field.
    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }
}
