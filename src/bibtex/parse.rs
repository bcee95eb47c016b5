//! BibTeX format parsing implementation.
//!
//! This module handles the low-level parsing of BibTeX formatted text.
//! Entry types and field names are lowercase-normalized; citation keys are
//! kept verbatim. Free text between entries is ignored, as BibTeX itself
//! treats it as commentary.

use crate::{BibError, Entry};

/// Parse the content of a BibTeX formatted file into entries.
///
/// `@comment`, `@preamble`, and `@string` directives are skipped. Malformed
/// syntax inside an entry is a fatal [`BibError::Syntax`] carrying the
/// 1-based line number.
pub(crate) fn bibtex_parse<S: AsRef<str>>(bib_text: S) -> Result<Vec<Entry>, BibError> {
    let mut cursor = Cursor::new(bib_text.as_ref());
    let mut entries = Vec::new();

    while let Some(c) = cursor.peek() {
        if c == '@' {
            cursor.bump();
            let line = cursor.line;
            let kind = cursor.eat_identifier().to_lowercase();
            if kind.is_empty() {
                return Err(BibError::syntax(line, "expected entry type after '@'"));
            }
            if matches!(kind.as_str(), "comment" | "preamble" | "string") {
                skip_directive(&mut cursor)?;
            } else {
                entries.push(parse_entry_body(&mut cursor, kind)?);
            }
        } else {
            // Text outside of an @entry is ignored, as BibTeX does.
            cursor.bump();
        }
    }

    Ok(entries)
}

/// Parse the `{key, field = value, ...}` body following `@type`.
fn parse_entry_body(cursor: &mut Cursor, entry_type: String) -> Result<Entry, BibError> {
    cursor.skip_whitespace();
    let open_line = cursor.line;
    let close = match cursor.bump() {
        Some('{') => '}',
        Some('(') => ')',
        _ => {
            return Err(BibError::syntax(
                open_line,
                format!("expected '{{' after '@{entry_type}'"),
            ));
        }
    };

    cursor.skip_whitespace();
    let key_line = cursor.line;
    let key = cursor.take_while(|c| c != ',' && c != close && !c.is_whitespace());
    if key.is_empty() {
        return Err(BibError::syntax(key_line, "missing citation key"));
    }

    let mut entry = Entry::new(key, entry_type);
    cursor.skip_whitespace();
    loop {
        match cursor.peek() {
            None => return Err(BibError::syntax(cursor.line, "unterminated entry")),
            Some(c) if c == close => {
                cursor.bump();
                break;
            }
            Some(',') => {
                cursor.bump();
                cursor.skip_whitespace();
            }
            Some(_) => {
                let line = cursor.line;
                let name = cursor.eat_identifier().to_lowercase();
                if name.is_empty() {
                    return Err(BibError::syntax(line, "expected field name"));
                }
                cursor.skip_whitespace();
                if cursor.bump() != Some('=') {
                    return Err(BibError::syntax(
                        line,
                        format!("expected '=' after field '{name}'"),
                    ));
                }
                let value = parse_value(cursor)?;
                entry.set(name, value);
                cursor.skip_whitespace();
            }
        }
    }

    Ok(entry)
}

/// Parse a field value: brace-delimited, quote-delimited, or a bare token,
/// with `#` concatenation of successive parts. Interior whitespace runs are
/// collapsed to single spaces.
fn parse_value(cursor: &mut Cursor) -> Result<String, BibError> {
    let mut parts = Vec::new();
    loop {
        cursor.skip_whitespace();
        let line = cursor.line;
        let part = match cursor.peek() {
            Some('{') => take_braced(cursor)?,
            Some('"') => take_quoted(cursor)?,
            Some(c) if c.is_alphanumeric() => cursor.eat_identifier(),
            _ => return Err(BibError::syntax(line, "expected field value")),
        };
        parts.push(part);
        cursor.skip_whitespace();
        if cursor.peek() == Some('#') {
            cursor.bump();
        } else {
            break;
        }
    }
    Ok(collapse_whitespace(&parts.concat()))
}

/// Consume a balanced `{...}` group, returning its content without the
/// outermost braces. Inner braces are preserved.
fn take_braced(cursor: &mut Cursor) -> Result<String, BibError> {
    let start_line = cursor.line;
    cursor.bump(); // opening brace
    let mut depth = 1usize;
    let mut content = String::new();
    while let Some(c) = cursor.bump() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(content);
                }
            }
            _ => {}
        }
        content.push(c);
    }
    Err(BibError::syntax(start_line, "unterminated brace group"))
}

/// Consume a `"..."` value. A closing quote inside a brace group does not
/// terminate the value.
fn take_quoted(cursor: &mut Cursor) -> Result<String, BibError> {
    let start_line = cursor.line;
    cursor.bump(); // opening quote
    let mut depth = 0usize;
    let mut content = String::new();
    while let Some(c) = cursor.bump() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '"' if depth == 0 => return Ok(content),
            _ => {}
        }
        content.push(c);
    }
    Err(BibError::syntax(start_line, "unterminated quoted value"))
}

/// Skip the balanced group of an `@comment`/`@preamble`/`@string` directive.
fn skip_directive(cursor: &mut Cursor) -> Result<(), BibError> {
    cursor.skip_whitespace();
    let line = cursor.line;
    let (open, close) = match cursor.bump() {
        Some('{') => ('{', '}'),
        Some('(') => ('(', ')'),
        _ => return Err(BibError::syntax(line, "expected '{' after directive")),
    };
    let mut depth = 1usize;
    while let Some(c) = cursor.bump() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Ok(());
            }
        }
    }
    Err(BibError::syntax(line, "unterminated directive"))
}

/// Collapse interior whitespace runs (including line breaks) to single spaces.
fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Character cursor over the input with 1-based line tracking.
struct Cursor {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl Cursor {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Consume an identifier: entry types, field names, and bare values.
    fn eat_identifier(&mut self) -> String {
        self.take_while(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '.' | '+'))
    }

    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            out.push(c);
            self.bump();
        }
        out
    }
}
