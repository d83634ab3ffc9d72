//! Record type and line escaping
//!
//! A record line must never contain a literal control character, so line
//! framing stays unambiguous for any title or sentence content. Backslash
//! escapes cover the common cases; remaining C0 controls use `\xNN`.

use crate::error::{CorpusError, Result};

/// One article's accepted, deduplicated sentences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRecord {
    pub title: String,
    /// Sentences in document order
    pub sentences: Vec<String>,
}

impl TextRecord {
    pub fn new(title: impl Into<String>, sentences: Vec<String>) -> Self {
        Self {
            title: title.into(),
            sentences,
        }
    }
}

/// Escape a value for one record line.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}

/// Reverse [`escape`]; rejects malformed escape sequences.
pub fn unescape(line: &str) -> Result<String> {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('x') => {
                let hi = chars.next();
                let lo = chars.next();
                let (hi, lo) = match (hi, lo) {
                    (Some(hi), Some(lo)) => (hi, lo),
                    _ => {
                        return Err(CorpusError::Stream(
                            "truncated \\x escape".to_string(),
                        ))
                    }
                };
                let code = u32::from_str_radix(&format!("{}{}", hi, lo), 16)
                    .map_err(|_| CorpusError::Stream(format!("bad \\x escape: {}{}", hi, lo)))?;
                let decoded = char::from_u32(code).ok_or_else(|| {
                    CorpusError::Stream(format!("bad \\x escape codepoint: {:#x}", code))
                })?;
                out.push(decoded);
            }
            Some(other) => {
                return Err(CorpusError::Stream(format!(
                    "unknown escape sequence: \\{}",
                    other
                )));
            }
            None => {
                return Err(CorpusError::Stream(
                    "dangling backslash at end of line".to_string(),
                ));
            }
        }
    }
    Ok(out)
}
