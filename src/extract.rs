//! Citation-key extraction from LaTeX documents.
//!
//! Scans document text for `\cite`-family commands (`\cite`, `\citet`,
//! `\citep*`, `\citeauthor`, ...) and collects the comma-separated keys
//! inside the braces. Anything that does not match the marker pattern is
//! ignored, so arbitrary or malformed LaTeX never causes an error.

use crate::regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static CITE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\cite[a-zA-Z]*\*?\{([^}]*)\}").unwrap());

/// Extracts the set of citation keys referenced in one document.
///
/// Keys are trimmed; empty tokens (as in `\cite{a,,b}`) are skipped.
/// Duplicates collapse naturally.
pub fn citation_keys(text: &str) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();
    for captures in CITE_REGEX.captures_iter(text) {
        for key in captures[1].split(',') {
            let key = key.trim();
            if !key.is_empty() {
                keys.insert(key.to_string());
            }
        }
    }
    keys
}

/// Extracts the union of citation keys across a collection of documents.
///
/// With the `parallel` feature the per-document scan fans out across threads;
/// the result is a set union, so the outcome is independent of completion
/// order either way.
pub fn citation_key_set(texts: &[String]) -> BTreeSet<String> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        texts
            .par_iter()
            .map(|text| citation_keys(text))
            .reduce(BTreeSet::new, merge)
    }
    #[cfg(not(feature = "parallel"))]
    {
        texts
            .iter()
            .map(|text| citation_keys(text))
            .fold(BTreeSet::new(), merge)
    }
}

fn merge(mut left: BTreeSet<String>, mut right: BTreeSet<String>) -> BTreeSet<String> {
    left.append(&mut right);
    left
}
