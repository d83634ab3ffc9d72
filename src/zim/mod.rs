//! ZIM archive reading
//!
//! Parses the archive header and index structures, resolves directory entries
//! to their decompressed payloads, and iterates the entries that are real
//! articles.
//!
//! ## On-Disk Layout (little-endian)
//! ```text
//! ┌────────────┬───────────┬─────────────┬─────────────┬──────────────┐
//! │ Header(80) │ MIME list │ URL ptrs    │ Title ptrs  │ Cluster ptrs │
//! └────────────┴───────────┴─────────────┴─────────────┴──────────────┘
//!       │                        │                            │
//!       │                        ▼                            ▼
//!       │                  Directory entries            Clusters (blobs)
//! ```

mod archive;
mod cluster;
mod entry;
mod header;
mod select;

pub use archive::Archive;
pub use cluster::{Cluster, Compression};
pub use entry::{ArticleEntry, DirectoryEntry, RedirectEntry};
pub use header::ZimHeader;
pub use select::ArticleIter;

/// Namespace tag marking main-content articles
pub const ARTICLE_NAMESPACE: u8 = b'A';
