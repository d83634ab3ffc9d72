//! Directory entry parsing
//!
//! Each URL-pointer slot points at a variable-length directory entry. The
//! leading u16 doubles as a discriminant: ordinary values index the MIME
//! list, while the top sentinel values mark redirects and special entries.
//!
//! ## Entry Layout
//! ```text
//! ┌──────────┬───────────┬──────────┬─────────┬──────────────┬─────┬───────┐
//! │ mime(2)  │ param(1)  │ ns(1)    │ rev(4)  │ location     │ url │ title │
//! └──────────┴───────────┴──────────┴─────────┴──────────────┴─────┴───────┘
//! location = redirect target index (4)            if mime == 0xffff
//!          = cluster index (4) + blob index (4)   otherwise
//! url/title are zero-terminated UTF-8
//! ```

use crate::error::{CorpusError, Result};
use super::header::{read_u16, read_u32};

/// Sentinel mimetype marking a redirect entry
const MIME_REDIRECT: u16 = 0xffff;
/// Sentinel mimetypes marking link targets and deleted entries
const MIME_LINK_TARGET: u16 = 0xfffe;
const MIME_DELETED: u16 = 0xfffd;

/// One parsed directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryEntry {
    /// Real content with a payload stored in a cluster blob
    Article(ArticleEntry),
    /// Alias pointing at another directory entry
    Redirect(RedirectEntry),
    /// Link-target or deleted entry; carries no payload and is always skipped
    Special { namespace: u8 },
}

/// A content-bearing directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleEntry {
    pub namespace: u8,
    pub url: String,
    pub title: String,
    /// Index into the archive's MIME string list
    pub mimetype_index: u16,
    pub cluster_index: u32,
    pub blob_index: u32,
}

/// A redirect directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectEntry {
    pub namespace: u8,
    pub url: String,
    pub title: String,
    /// URL-pointer index of the target entry
    pub target_index: u32,
}

impl DirectoryEntry {
    /// Parse a directory entry from a buffer starting at its first byte.
    ///
    /// The buffer only needs to extend through the entry's title terminator,
    /// not to the end of the file.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() < 8 {
            return Err(CorpusError::CorruptArchive(
                "directory entry truncated before header".to_string(),
            ));
        }
        let mimetype = read_u16(buf, 0);
        let namespace = buf[3];

        match mimetype {
            // Layouts differ between link targets and deleted entries; the
            // selector drops both, so only the discriminant matters here.
            MIME_LINK_TARGET | MIME_DELETED => Ok(DirectoryEntry::Special { namespace }),
            MIME_REDIRECT => {
                if buf.len() < 12 {
                    return Err(CorpusError::CorruptArchive(
                        "redirect entry truncated".to_string(),
                    ));
                }
                let target_index = read_u32(buf, 8);
                let (url, after_url) = read_zero_terminated(buf, 12)?;
                let (title, _) = read_zero_terminated(buf, after_url)?;
                Ok(DirectoryEntry::Redirect(RedirectEntry {
                    namespace,
                    url,
                    title,
                    target_index,
                }))
            }
            _ => {
                if buf.len() < 16 {
                    return Err(CorpusError::CorruptArchive(
                        "article entry truncated".to_string(),
                    ));
                }
                let cluster_index = read_u32(buf, 8);
                let blob_index = read_u32(buf, 12);
                let (url, after_url) = read_zero_terminated(buf, 16)?;
                let (title, _) = read_zero_terminated(buf, after_url)?;
                Ok(DirectoryEntry::Article(ArticleEntry {
                    namespace,
                    url,
                    title,
                    mimetype_index: mimetype,
                    cluster_index,
                    blob_index,
                }))
            }
        }
    }

    /// Entry namespace tag
    pub fn namespace(&self) -> u8 {
        match self {
            DirectoryEntry::Article(a) => a.namespace,
            DirectoryEntry::Redirect(r) => r.namespace,
            DirectoryEntry::Special { namespace } => *namespace,
        }
    }

    /// Entry URL; special entries have none
    pub fn url(&self) -> Option<&str> {
        match self {
            DirectoryEntry::Article(a) => Some(&a.url),
            DirectoryEntry::Redirect(r) => Some(&r.url),
            DirectoryEntry::Special { .. } => None,
        }
    }
}

/// Read a zero-terminated UTF-8 string starting at `at`; returns the string
/// and the offset just past the terminator.
fn read_zero_terminated(buf: &[u8], at: usize) -> Result<(String, usize)> {
    if at > buf.len() {
        return Err(CorpusError::CorruptArchive(
            "directory entry string starts past buffer".to_string(),
        ));
    }
    let rest = &buf[at..];
    let end = rest.iter().position(|&b| b == 0).ok_or_else(|| {
        CorpusError::CorruptArchive("unterminated string in directory entry".to_string())
    })?;
    let text = std::str::from_utf8(&rest[..end])
        .map_err(|_| CorpusError::CorruptArchive("non-UTF-8 string in directory entry".to_string()))?
        .to_string();
    Ok((text, at + end + 1))
}
