//! BibTeX format reader and writer.
//!
//! This is the serialization boundary of the pipeline: records go in as
//! BibTeX markup and come out as [`Entry`] values, and vice versa. The rest
//! of the crate never touches BibTeX syntax.
//!
//! # Example
//!
//! ```
//! use bibtidy::BibtexParser;
//!
//! let input = r#"@article{smith2020,
//!     author = {Smith, John},
//!     title = {An Example Title},
//! }"#;
//!
//! let entries = BibtexParser::new().parse(input).unwrap();
//! assert_eq!(entries[0].key, "smith2020");
//! assert_eq!(entries[0].get("title"), Some("An Example Title"));
//! ```

pub(crate) mod parse;
mod write;

use crate::{Entry, Result};
use parse::bibtex_parse;
pub use write::{write_entries, write_entry};

/// Parser for BibTeX format bibliography databases.
#[derive(Debug, Clone, Default)]
pub struct BibtexParser;

impl BibtexParser {
    /// Creates a new BibTeX parser instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a string containing zero or more BibTeX entries.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BibError::Syntax`] if an entry is malformed; the
    /// error carries the 1-based line number. Text outside of entries and
    /// `@comment`/`@preamble`/`@string` directives never cause errors.
    pub fn parse(&self, input: &str) -> Result<Vec<Entry>> {
        bibtex_parse(input)
    }
}
