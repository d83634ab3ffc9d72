//! ZIM header parsing and validation
//!
//! The header is a fixed 80-byte little-endian block at the start of the
//! file. Validation is strict: a bad magic number, an unsupported major
//! version, or any index offset outside the file bounds rejects the archive
//! outright.

use crate::error::{CorpusError, Result};

/// Magic number at offset 0 of every ZIM file
pub const ZIM_MAGIC: u32 = 72_173_914;

/// Header size in bytes
pub const HEADER_SIZE: usize = 80;

/// Major versions this reader understands
const SUPPORTED_MAJOR_VERSIONS: [u16; 2] = [5, 6];

/// Parsed and validated ZIM file header
#[derive(Debug, Clone)]
pub struct ZimHeader {
    /// Format major version (5 or 6)
    pub major_version: u16,
    /// Format minor version
    pub minor_version: u16,
    /// Number of directory entries
    pub entry_count: u32,
    /// Number of clusters
    pub cluster_count: u32,
    /// Offset of the URL pointer table (entry_count u64 values)
    pub url_ptr_pos: u64,
    /// Offset of the title pointer table (entry_count u32 values)
    pub title_ptr_pos: u64,
    /// Offset of the cluster pointer table (cluster_count u64 values)
    pub cluster_ptr_pos: u64,
    /// Offset of the MIME type string list
    pub mime_list_pos: u64,
}

impl ZimHeader {
    /// Parse a header from the first [`HEADER_SIZE`] bytes of the file and
    /// validate it against the total file length.
    pub fn parse(buf: &[u8], file_len: u64) -> Result<Self> {
        if buf.len() < HEADER_SIZE {
            return Err(CorpusError::CorruptArchive(format!(
                "file too short for header: {} bytes",
                buf.len()
            )));
        }

        let magic = read_u32(buf, 0);
        if magic != ZIM_MAGIC {
            return Err(CorpusError::CorruptArchive(format!(
                "bad magic number: {:#010x}",
                magic
            )));
        }

        let major_version = read_u16(buf, 4);
        let minor_version = read_u16(buf, 6);
        if !SUPPORTED_MAJOR_VERSIONS.contains(&major_version) {
            return Err(CorpusError::CorruptArchive(format!(
                "unsupported major version: {}",
                major_version
            )));
        }

        let header = Self {
            major_version,
            minor_version,
            entry_count: read_u32(buf, 24),
            cluster_count: read_u32(buf, 28),
            url_ptr_pos: read_u64(buf, 32),
            title_ptr_pos: read_u64(buf, 40),
            cluster_ptr_pos: read_u64(buf, 48),
            mime_list_pos: read_u64(buf, 56),
        };
        header.validate_bounds(file_len)?;
        Ok(header)
    }

    /// Every index table must lie entirely within the file.
    fn validate_bounds(&self, file_len: u64) -> Result<()> {
        let tables: [(&str, u64, u64); 4] = [
            ("URL pointer table", self.url_ptr_pos, self.entry_count as u64 * 8),
            ("title pointer table", self.title_ptr_pos, self.entry_count as u64 * 4),
            ("cluster pointer table", self.cluster_ptr_pos, self.cluster_count as u64 * 8),
            ("MIME list", self.mime_list_pos, 0),
        ];
        for (name, pos, extent) in tables {
            let end = pos.checked_add(extent).ok_or_else(|| {
                CorpusError::CorruptArchive(format!("{} offset overflows", name))
            })?;
            if end > file_len {
                return Err(CorpusError::CorruptArchive(format!(
                    "{} extends past end of file ({} > {})",
                    name, end, file_len
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Little-Endian Helpers
// =============================================================================

pub(crate) fn read_u16(buf: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([buf[at], buf[at + 1]])
}

pub(crate) fn read_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

pub(crate) fn read_u64(buf: &[u8], at: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[at..at + 8]);
    u64::from_le_bytes(bytes)
}
