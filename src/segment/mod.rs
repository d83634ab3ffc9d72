//! Sentence segmentation
//!
//! Splits simplified text units into sentence candidates and applies the
//! acceptance heuristics. A terminator (`.`, `!`, `?`) ends a sentence when
//! it is followed by whitespace and a capital letter, or by the end of the
//! unit — unless the text ends in a known abbreviation or a single-letter
//! initial. Candidates survive only if they look like prose: at least one
//! alphabetic character, length within configured bounds, and no leading
//! markup leftovers.
//!
//! Rejections here are expected filtering outcomes, never errors.

mod dedup;

pub use dedup::{normalize, DedupSet};

use std::collections::HashSet;

use crate::config::Config;

/// Leading characters that betray mis-simplified markup
const MARKUP_LEFTOVERS: &[char] = &['[', ']', '{', '}', '|', '<', '>', '*', '=', ';'];

/// Configurable sentence splitter
pub struct Segmenter {
    /// Case-folded abbreviations, terminator included ("dr.", "p.m.");
    /// multi-word entries ("et al.") are matched against the last two tokens
    abbreviations: HashSet<String>,
    min_chars: usize,
    max_chars: usize,
}

impl Segmenter {
    pub fn new(config: &Config) -> Self {
        Self {
            abbreviations: config
                .abbreviations
                .iter()
                .map(|a| a.to_lowercase())
                .collect(),
            min_chars: config.min_sentence_chars,
            max_chars: config.max_sentence_chars,
        }
    }

    /// Split one text unit into accepted sentence candidates, in document
    /// order. Original casing and internal punctuation are preserved.
    pub fn segment(&self, unit: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut start = 0;

        for (pos, ch) in unit.char_indices() {
            if !matches!(ch, '.' | '!' | '?') {
                continue;
            }
            let end = pos + ch.len_utf8();
            if end <= start {
                continue;
            }
            if self.is_terminal(unit, start, end, ch) {
                self.push_accepted(&unit[start..end], &mut sentences);
                start = end;
            }
        }

        // Whatever trails the last terminator is still a candidate; the
        // acceptance heuristics weed out fragments.
        self.push_accepted(&unit[start..], &mut sentences);
        sentences
    }

    /// Whether the terminator ending at byte `end` closes a sentence.
    fn is_terminal(&self, unit: &str, start: usize, end: usize, ch: char) -> bool {
        // A period after an abbreviation or initial never terminates.
        if ch == '.' && self.ends_in_abbreviation(&unit[start..end]) {
            return false;
        }

        let mut rest = unit[end..].chars();
        match rest.next() {
            None => true,
            Some(next) if next.is_whitespace() => {
                match rest.find(|c| !c.is_whitespace()) {
                    Some(first) => first.is_uppercase(),
                    // Trailing whitespace only
                    None => true,
                }
            }
            // "3.14", "U.S.A": terminator embedded in a token
            Some(_) => false,
        }
    }

    /// Check the last one and two whitespace-delimited tokens of `head`
    /// (terminator included) against the abbreviation list, plus the
    /// single-letter-initial rule.
    fn ends_in_abbreviation(&self, head: &str) -> bool {
        let mut tokens = head.split_whitespace().rev();
        let last = match tokens.next() {
            Some(token) => token.to_lowercase(),
            None => return false,
        };

        if self.abbreviations.contains(&last) {
            return true;
        }
        // Single-letter initials: "J. R. R. Tolkien"
        let mut chars = last.chars();
        if let (Some(first), Some('.'), None) = (chars.next(), chars.next(), chars.next()) {
            if first.is_alphabetic() {
                return true;
            }
        }
        // Multi-word abbreviations ("et al.")
        if let Some(previous) = tokens.next() {
            let pair = format!("{} {}", previous.to_lowercase(), last);
            if self.abbreviations.contains(&pair) {
                return true;
            }
        }
        false
    }

    /// Trim a candidate and keep it if it passes the acceptance heuristics.
    fn push_accepted(&self, candidate: &str, sentences: &mut Vec<String>) {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return;
        }
        if self.accept(candidate) {
            sentences.push(candidate.to_string());
        }
    }

    /// Acceptance heuristics for a trimmed candidate.
    fn accept(&self, candidate: &str) -> bool {
        let chars = candidate.chars().count();
        if chars < self.min_chars || chars > self.max_chars {
            return false;
        }
        if !candidate.chars().any(char::is_alphabetic) {
            return false;
        }
        if candidate.starts_with(MARKUP_LEFTOVERS) {
            return false;
        }
        true
    }
}
