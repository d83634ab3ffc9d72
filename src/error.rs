//! Error types for zimcorpus
//!
//! Provides a unified error type for all operations.
//!
//! Only `CorruptArchive` is ever fatal to a run: it means the archive header
//! or index structures failed validation. Everything else is scoped to a
//! single cluster, article, or record and is recovered by skipping.

use thiserror::Error;

/// Result type alias using CorpusError
pub type Result<T> = std::result::Result<T, CorpusError>;

/// Unified error type for zimcorpus operations
#[derive(Debug, Error)]
pub enum CorpusError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Archive Errors
    // -------------------------------------------------------------------------
    /// Header or index validation failed; aborts the whole run.
    #[error("corrupt archive: {0}")]
    CorruptArchive(String),

    /// A cluster failed to decompress or its blob table is malformed.
    /// Scoped to the cluster; the run continues.
    #[error("cluster decompression failed: {0}")]
    Decompression(String),

    // -------------------------------------------------------------------------
    // Extraction Errors
    // -------------------------------------------------------------------------
    /// An article payload could not be parsed as markup.
    /// Scoped to the article; the run continues.
    #[error("malformed markup: {0}")]
    MalformedMarkup(String),

    // -------------------------------------------------------------------------
    // Stream Format Errors
    // -------------------------------------------------------------------------
    #[error("record stream error: {0}")]
    Stream(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("configuration error: {0}")]
    Config(String),
}
