//! HTML simplification
//!
//! Turns an article's HTML payload into a flat list of text units. The tree
//! is walked iteratively with an explicit exclusion stack: entering an
//! excluded element (tables, figures, navigation and infobox containers,
//! reference blocks, script/style) pushes a marker and suppresses all
//! descendant text until that subtree is exited. Inline formatting tags are
//! transparent; block tags are hard unit boundaries. Entity references are
//! decoded by the tokenizer, whitespace runs collapse to a single space per
//! unit.

use ego_tree::iter::Edge;
use scraper::node::{Element, Node};
use scraper::{Html, Selector};

use crate::error::{CorpusError, Result};

/// Elements whose entire subtree is dropped
const EXCLUDED_TAGS: &[&str] = &[
    "table", "thead", "tbody", "tfoot", "caption",
    "img", "figure", "figcaption", "audio", "video", "map",
    "math", "svg",
    "script", "style", "noscript",
    "nav", "footer", "form", "input", "button", "select", "option",
    "pre", "hr", "meta", "link",
    "rp", "rt", "rtc",
];

/// Class fragments marking Wikipedia furniture (infoboxes, navboxes,
/// reference lists, edit links) that is dropped wholesale
const EXCLUDED_CLASS_FRAGMENTS: &[&str] = &[
    "infobox", "navbox", "metadata", "mw-editsection", "reference", "reflist",
    "thumb", "noprint", "hatnote", "sidebar", "toc",
];

/// Elements that end the current text unit and begin a new one
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "main", "body", "html",
    "h1", "h2", "h3", "h4", "h5", "h6",
    "ul", "ol", "dl", "li", "dt", "dd",
    "blockquote", "br", "td", "th", "tr",
];

/// Wikipedia appends a license notice as a final paragraph; it is boilerplate
/// shared by every article and is dropped.
const LICENSE_NOTICE_PREFIX: &str = "This article is issued from";

/// HTML simplifier with precompiled content-root selectors
pub struct Simplifier {
    /// Wikipedia's article body container
    content_selector: Selector,
}

impl Default for Simplifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Simplifier {
    pub fn new() -> Self {
        Self {
            // Static selector, cannot fail to parse
            content_selector: Selector::parse("div#mw-content-text").unwrap(),
        }
    }

    /// Simplify an HTML payload into trimmed, whitespace-collapsed text
    /// units in document order.
    ///
    /// Fails with `MalformedMarkup` when the payload cannot be tokenized
    /// (not valid UTF-8); the caller skips the whole article in that case.
    pub fn simplify(&self, html: &[u8]) -> Result<Vec<String>> {
        let text = std::str::from_utf8(html)
            .map_err(|e| CorpusError::MalformedMarkup(format!("payload is not UTF-8: {}", e)))?;
        let document = Html::parse_document(text);

        // Prefer the article body container; degraded markup falls back to
        // the whole document.
        let root = document
            .select(&self.content_selector)
            .next()
            .map(|e| *e)
            .unwrap_or_else(|| *document.root_element());

        let mut units = Vec::new();
        let mut buffer = String::new();
        // Explicit stack of exclusion markers, pushed on element entry and
        // popped on exit; the top tells whether text is currently suppressed.
        let mut exclusion: Vec<bool> = Vec::new();

        for edge in root.traverse() {
            match edge {
                Edge::Open(node) => match node.value() {
                    Node::Element(element) => {
                        let inherited = exclusion.last().copied().unwrap_or(false);
                        let excluded = inherited || is_excluded(element);
                        if !excluded && is_block(element.name()) {
                            flush_unit(&mut buffer, &mut units);
                        }
                        exclusion.push(excluded);
                    }
                    Node::Text(text) => {
                        if !exclusion.last().copied().unwrap_or(false) {
                            buffer.push_str(text);
                        }
                    }
                    _ => {}
                },
                Edge::Close(node) => {
                    if let Node::Element(element) = node.value() {
                        let excluded = exclusion.pop().unwrap_or(false);
                        if !excluded && is_block(element.name()) {
                            flush_unit(&mut buffer, &mut units);
                        }
                    }
                }
            }
        }
        flush_unit(&mut buffer, &mut units);

        Ok(units)
    }
}

/// Whether this element's subtree contributes no text
fn is_excluded(element: &Element) -> bool {
    let name = element.name();
    if EXCLUDED_TAGS.contains(&name) {
        return true;
    }
    if let Some(classes) = element.attr("class") {
        for token in classes.split_ascii_whitespace() {
            let token = token.to_ascii_lowercase();
            if EXCLUDED_CLASS_FRAGMENTS
                .iter()
                .any(|fragment| token.contains(fragment))
            {
                return true;
            }
        }
    }
    false
}

/// Whether this tag is a hard text-unit boundary
fn is_block(name: &str) -> bool {
    BLOCK_TAGS.contains(&name)
}

/// Close the current unit: collapse whitespace, trim, drop empty units and
/// the trailing license notice.
fn flush_unit(buffer: &mut String, units: &mut Vec<String>) {
    if buffer.is_empty() {
        return;
    }
    let unit = collapse_whitespace(buffer);
    buffer.clear();
    if unit.is_empty() || unit.starts_with(LICENSE_NOTICE_PREFIX) {
        return;
    }
    units.push(unit);
}

/// Collapse runs of whitespace (including newlines and zero-width spaces)
/// to a single space, trimming the ends.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() || ch == '\u{200B}' {
            pending_space = !out.is_empty();
        } else {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapse_whitespace_folds_runs_and_trims() {
        assert_eq!(collapse_whitespace("  a \t\n b\u{200B}c  "), "a b c");
        assert_eq!(collapse_whitespace("a \t\r\n  b"), "a b");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn excluded_class_tokens_are_case_insensitive() {
        let html = Html::parse_fragment(r#"<div class="Infobox geography">x</div>"#);
        let element = html
            .root_element()
            .children()
            .find_map(|n| n.value().as_element().cloned())
            .unwrap();
        assert!(is_excluded(&element));
    }
}
