//! Cluster decompression and blob slicing
//!
//! A cluster is one decompression unit holding consecutive blobs. The first
//! byte selects the compression mode; the decompressed payload starts with a
//! blob offset table whose first value also reveals how many offsets there
//! are (offsets are relative to the start of the payload, and the table is
//! the first thing in it).

use std::io::Read;

use bytes::Bytes;

use crate::error::{CorpusError, Result};
use super::header::{read_u32, read_u64};

/// Compression mode of a cluster, from the low nibble of its info byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Blobs stored as-is
    None,
    /// XZ container around an LZMA2 stream
    Xz,
    /// Zstandard frame
    Zstd,
}

/// Extended clusters use 64-bit blob offsets
const EXTENDED_FLAG: u8 = 0x10;

/// A decompressed cluster: blob offset table plus payload
#[derive(Debug)]
pub struct Cluster {
    payload: Bytes,
    /// blob_count + 1 offsets into `payload`
    offsets: Vec<u64>,
}

impl Cluster {
    /// Parse a cluster from its raw on-disk bytes (starting at the info
    /// byte). For compressed clusters the raw slice may extend past the
    /// compressed stream; the decoder stops at end of stream.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let info = *raw.first().ok_or_else(|| {
            CorpusError::Decompression("empty cluster".to_string())
        })?;
        let extended = info & EXTENDED_FLAG != 0;
        let body = &raw[1..];

        let compression = match info & 0x0f {
            0 | 1 => Compression::None,
            4 => Compression::Xz,
            5 => Compression::Zstd,
            other => {
                return Err(CorpusError::Decompression(format!(
                    "unknown compression mode {}",
                    other
                )));
            }
        };

        let payload: Bytes = match compression {
            Compression::None => Bytes::copy_from_slice(body),
            Compression::Xz => {
                let mut decoded = Vec::new();
                xz2::read::XzDecoder::new(body)
                    .read_to_end(&mut decoded)
                    .map_err(|e| CorpusError::Decompression(format!("xz: {}", e)))?;
                Bytes::from(decoded)
            }
            Compression::Zstd => {
                let decoded = zstd::decode_all(body)
                    .map_err(|e| CorpusError::Decompression(format!("zstd: {}", e)))?;
                Bytes::from(decoded)
            }
        };

        let offsets = Self::parse_offsets(&payload, extended)?;
        Ok(Self { payload, offsets })
    }

    /// Read the blob offset table from the head of the payload.
    fn parse_offsets(payload: &[u8], extended: bool) -> Result<Vec<u64>> {
        let width = if extended { 8 } else { 4 };
        if payload.len() < width {
            return Err(CorpusError::Decompression(
                "cluster payload shorter than one offset".to_string(),
            ));
        }
        let first = if extended {
            read_u64(payload, 0)
        } else {
            read_u32(payload, 0) as u64
        };
        if first % width as u64 != 0 || first == 0 {
            return Err(CorpusError::Decompression(format!(
                "misaligned first blob offset {}",
                first
            )));
        }
        let count = (first / width as u64) as usize;
        if count * width > payload.len() {
            return Err(CorpusError::Decompression(
                "blob offset table extends past payload".to_string(),
            ));
        }

        let mut offsets = Vec::with_capacity(count);
        for i in 0..count {
            let off = if extended {
                read_u64(payload, i * width)
            } else {
                read_u32(payload, i * width) as u64
            };
            if off > payload.len() as u64 {
                return Err(CorpusError::Decompression(format!(
                    "blob offset {} past payload end {}",
                    off,
                    payload.len()
                )));
            }
            if let Some(&prev) = offsets.last() {
                if off < prev {
                    return Err(CorpusError::Decompression(
                        "blob offsets not monotonic".to_string(),
                    ));
                }
            }
            offsets.push(off);
        }
        Ok(offsets)
    }

    /// Number of blobs in this cluster
    pub fn blob_count(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Zero-copy slice of one blob's bytes
    pub fn blob(&self, index: u32) -> Result<Bytes> {
        let index = index as usize;
        if index + 1 >= self.offsets.len() {
            return Err(CorpusError::Decompression(format!(
                "blob index {} out of range ({} blobs)",
                index,
                self.blob_count()
            )));
        }
        let start = self.offsets[index] as usize;
        let end = self.offsets[index + 1] as usize;
        Ok(self.payload.slice(start..end))
    }
}
