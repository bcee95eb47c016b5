//! Title and author normalization.
//!
//! Title casing tokenizes on whitespace while treating brace groups and
//! `\command{...}` substrings as opaque tokens that pass through verbatim.
//! Capitalization uppercases the first letter and leaves the remainder
//! unchanged, so interior capitals ("McDonald", "eXtreme") survive in
//! titles. Tokens are rejoined with single spaces; original whitespace and
//! line breaks are not preserved.
//!
//! Author normalization rewrites each name as `"Last, First"` with a full
//! capitalize transform (first letter upper, remainder lower) on every name
//! token. This mangles multi-word surnames without commas ("van Gogh") and
//! names with internal capitals ("McDonald" becomes "Mcdonald"); that is a
//! known lossy behavior of the transform, not special-cased.

use crate::Entry;
use crate::regex::Regex;
use std::sync::LazyLock;

/// Interior words that stay lowercase in titles.
const SHORT_WORDS: &[&str] = &[
    "a", "an", "the", "and", "but", "or", "for", "nor", "on", "at", "to", "from", "by", "of",
    "in", "out", "over", "with", "is", "as", "if", "be", "into", "than", "that",
];

static TITLE_TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\[a-zA-Z]+\{.*?\}|\{.*?\}|\S+").unwrap());

/// Configuration options for the normalization stage.
#[derive(Debug, Clone, Default)]
pub struct NormalizerConfig {
    /// Whether to rewrite `author` fields as `"Last, First"`. Title casing
    /// is always applied.
    pub normalize_authors: bool,
}

/// Rewrites title casing and, optionally, author name formatting.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    /// Creates a normalizer with default configuration (authors untouched).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a normalizer with custom configuration.
    #[must_use]
    pub fn with_config(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Normalizes one entry, consuming and returning it.
    pub fn normalize(&self, mut entry: Entry) -> Entry {
        let title = entry.get("title").map(title_case);
        if let Some(title) = title {
            entry.set("title", title);
        }
        if self.config.normalize_authors {
            let author = entry.get("author").map(format_authors);
            if let Some(author) = author {
                entry.set("author", author);
            }
        }
        entry
    }
}

/// Applies title casing to a single title string.
///
/// All-caps words are assumed to be acronyms and left untouched. The first
/// and last tokens are always capitalized; interior words from the short-word
/// set are forced lowercase; every other interior word is capitalized.
pub fn title_case(title: &str) -> String {
    let tokens: Vec<&str> = TITLE_TOKEN_REGEX
        .find_iter(title)
        .map(|m| m.as_str())
        .collect();
    let count = tokens.len();

    let mut parts = Vec::with_capacity(count);
    for (i, token) in tokens.iter().enumerate() {
        if token.starts_with('\\') || (token.starts_with('{') && token.ends_with('}')) {
            // LaTeX command or brace group, pass through verbatim
            parts.push((*token).to_string());
        } else if is_all_caps(token) {
            parts.push((*token).to_string());
        } else if i != 0 && i + 1 != count && SHORT_WORDS.contains(&token.to_lowercase().as_str())
        {
            parts.push(token.to_lowercase());
        } else {
            parts.push(capitalize_first(token));
        }
    }
    parts.join(" ")
}

/// Rewrites an author field as `"Last, First"` names joined by `" and "`.
pub fn format_authors(author_field: &str) -> String {
    author_field
        .split(" and ")
        .map(|name| format_author(name.trim()))
        .collect::<Vec<_>>()
        .join(" and ")
}

fn format_author(name: &str) -> String {
    let (last, given) = if let Some((last, given)) = name.split_once(',') {
        // Already "Last, First"
        (last.trim().to_string(), given.trim().to_string())
    } else {
        let tokens: Vec<&str> = name.split_whitespace().collect();
        match tokens.len() {
            0 => return String::new(),
            1 => (tokens[0].to_string(), String::new()),
            n => (tokens[n - 1].to_string(), tokens[..n - 1].join(" ")),
        }
    };

    let last = capitalize(&last);
    let given = given
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");

    if given.is_empty() {
        last
    } else {
        format!("{last}, {given}")
    }
}

/// At least one cased character, none of them lowercase.
fn is_all_caps(word: &str) -> bool {
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}

/// Uppercases the first letter, leaves the remainder unchanged.
fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Uppercases the first letter, lowercases the remainder.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
