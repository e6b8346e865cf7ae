//! Lexical scan of INI text into raw, ordered sections.
//!
//! This layer knows nothing about inheritance, conditions or dotted keys. It
//! only splits the text into `[header]` blocks and `key = value` pairs.

use indexmap::IndexMap;

use super::error::LexError;

/// Entries lexed under a single header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entries {
    /// A bare top-level `key = value` line. The "header" is the key.
    Scalar(String),
    /// The body of a `[section]`, in source order.
    Map(IndexMap<String, String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSection {
    pub header: String,
    /// 1-based line the header (or bare key) appeared on.
    pub line: usize,
    pub entries: Entries,
}

/// Splits `input` into raw sections in source order.
///
/// A header repeated verbatim reopens its first occurrence: the later keys
/// are folded into the earlier body, overwriting in place.
pub fn lex(input: &str) -> Result<Vec<RawSection>, LexError> {
    let mut sections: Vec<RawSection> = Vec::new();
    let mut current: Option<usize> = None;

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();

        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let header = section_header(rest)
                .ok_or_else(|| LexError::new(line_no, "unterminated section header"))?;
            if header.trim().is_empty() {
                return Err(LexError::new(line_no, "empty section name"));
            }

            let existing = sections.iter().position(|section| {
                section.header == header && matches!(section.entries, Entries::Map(_))
            });
            current = Some(existing.unwrap_or_else(|| {
                sections.push(RawSection {
                    header: header.to_string(),
                    line: line_no,
                    entries: Entries::Map(IndexMap::new()),
                });
                sections.len() - 1
            }));
            continue;
        }

        let (key, raw_value) = line
            .split_once('=')
            .ok_or_else(|| LexError::new(line_no, "expected `key = value`"))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(LexError::new(line_no, "empty key"));
        }
        let value = lex_value(raw_value.trim(), line_no)?;

        match current.and_then(|i| sections.get_mut(i)) {
            Some(RawSection {
                entries: Entries::Map(map),
                ..
            }) => {
                map.insert(key.to_string(), value);
            }
            _ => sections.push(RawSection {
                header: key.to_string(),
                line: line_no,
                entries: Entries::Scalar(value),
            }),
        }
    }

    Ok(sections)
}

/// Returns the text between `[` and the first `]` that is followed only by
/// whitespace or a comment.
fn section_header(rest: &str) -> Option<&str> {
    rest.match_indices(']').find_map(|(end, _)| {
        let tail = rest[end + 1..].trim_start();
        (tail.is_empty() || tail.starts_with(';') || tail.starts_with('#')).then(|| &rest[..end])
    })
}

/// Lexes the right-hand side of `key = value`.
fn lex_value(raw: &str, line: usize) -> Result<String, LexError> {
    let mut chars = raw.chars();

    match chars.next() {
        Some('"') => {
            let mut value = String::new();
            loop {
                match chars.next() {
                    Some('\\') => match chars.next() {
                        Some(escaped @ ('"' | '\\')) => value.push(escaped),
                        Some(other) => {
                            value.push('\\');
                            value.push(other);
                        }
                        None => return Err(LexError::new(line, "unterminated quoted value")),
                    },
                    Some('"') => break,
                    Some(ch) => value.push(ch),
                    None => return Err(LexError::new(line, "unterminated quoted value")),
                }
            }
            expect_line_end(chars.as_str(), line)?;
            Ok(value)
        }
        Some('\'') => {
            let rest = chars.as_str();
            let end = rest
                .find('\'')
                .ok_or_else(|| LexError::new(line, "unterminated quoted value"))?;
            expect_line_end(&rest[end + 1..], line)?;
            Ok(rest[..end].to_string())
        }
        _ => {
            let value = match raw.find(';') {
                Some(pos) => &raw[..pos],
                None => raw,
            };
            Ok(value.to_string())
        }
    }
}

/// After a closing quote only whitespace or a comment may follow.
fn expect_line_end(rest: &str, line: usize) -> Result<(), LexError> {
    let rest = rest.trim_start();
    if rest.is_empty() || rest.starts_with(';') || rest.starts_with('#') {
        Ok(())
    } else {
        Err(LexError::new(
            line,
            format!("unexpected text after quoted value: '{rest}'"),
        ))
    }
}
