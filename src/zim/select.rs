//! Article selection
//!
//! Iterates directory entries in URL order and yields only the ones worth
//! extracting: main-namespace, HTML mimetype, not a redirect. Entries that
//! fail the filter are an expected outcome, not an error; they are skipped
//! silently. Entries that fail to parse are logged and skipped.

use tracing::warn;

use super::archive::Archive;
use super::entry::{ArticleEntry, DirectoryEntry};
use super::ARTICLE_NAMESPACE;

/// Lazy iterator over selectable articles, in directory order.
///
/// Restartable: a fresh iterator from [`Archive::articles`] re-iterates from
/// the start; no cursor state is shared between passes.
pub struct ArticleIter<'a> {
    archive: &'a Archive,
    next_index: u32,
}

impl<'a> ArticleIter<'a> {
    pub(super) fn new(archive: &'a Archive) -> Self {
        Self {
            archive,
            next_index: 0,
        }
    }

    /// Whether an entry passes the selection rule.
    fn selectable(&self, entry: &DirectoryEntry) -> Option<ArticleEntry> {
        let article = match entry {
            DirectoryEntry::Article(article) => article,
            DirectoryEntry::Redirect(_) | DirectoryEntry::Special { .. } => return None,
        };
        if article.namespace != ARTICLE_NAMESPACE {
            return None;
        }
        let mime = self.archive.mime_type(article.mimetype_index)?;
        // "text/html; charset=utf-8" counts as HTML
        let essence = mime.split(';').next().unwrap_or(mime).trim();
        if essence != "text/html" {
            return None;
        }
        Some(article.clone())
    }
}

impl<'a> Iterator for ArticleIter<'a> {
    /// Directory index paired with the parsed article entry
    type Item = (u32, ArticleEntry);

    fn next(&mut self) -> Option<Self::Item> {
        while self.next_index < self.archive.entry_count() {
            let index = self.next_index;
            self.next_index += 1;

            match self.archive.directory_entry(index) {
                Ok(entry) => {
                    if let Some(article) = self.selectable(&entry) {
                        return Some((index, article));
                    }
                }
                Err(err) => {
                    warn!(index, %err, "skipping unparseable directory entry");
                }
            }
        }
        None
    }
}
