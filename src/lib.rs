//! # zimcorpus
//!
//! Converts a Wikipedia ZIM archive into a corpus of plain-text sentences:
//! - ZIM header/index parsing with lazy cluster decompression
//! - Article selection (main namespace, HTML mimetype, no redirects)
//! - HTML simplification (tables, infoboxes, navigation dropped; inline
//!   markup flattened)
//! - Sentence segmentation with abbreviation handling and run-scoped
//!   deduplication
//! - A streaming, escaped intermediate record format plus its reader
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌───────────────┐   ┌───────────────┐   ┌────────────────┐
//! │ Archive       │──▶│ ArticleIter   │──▶│ simplify       │
//! │ (ZIM reader)  │   │ (selection)   │   │ (HTML → units) │
//! └───────────────┘   └───────────────┘   └───────┬────────┘
//!                                                 │
//!                     ┌───────────────┐   ┌───────▼────────┐
//!                     │ RecordWriter  │◀──│ Segmenter +    │
//!                     │ (stream out)  │   │ DedupSet       │
//!                     └───────┬───────┘   └────────────────┘
//!                             │
//!                     ┌───────▼───────┐
//!                     │ RecordReader  │  (consumed later by the
//!                     │ (stream in)   │   plain-text converter)
//!                     └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod zim;
pub mod simplify;
pub mod segment;
pub mod stream;
pub mod pipeline;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CorpusError, Result};
pub use config::Config;
pub use pipeline::{ExtractStats, Extractor};
pub use stream::{RecordReader, RecordWriter, TextRecord};
pub use zim::Archive;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of zimcorpus
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
