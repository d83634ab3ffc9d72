//! Archive handle
//!
//! Opens a ZIM file, validates its header, and loads the three pointer
//! tables eagerly (URL order, title order, cluster order). Entry content is
//! never loaded eagerly: directory entries are parsed on demand and clusters
//! are decompressed lazily, with a small synchronized LRU cache so
//! consecutive entries sharing a cluster do not pay for decompression twice.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use lru::LruCache;
use parking_lot::Mutex;

use crate::error::{CorpusError, Result};
use super::cluster::Cluster;
use super::entry::{ArticleEntry, DirectoryEntry};
use super::header::{read_u32, read_u64, ZimHeader, HEADER_SIZE};
use super::select::ArticleIter;

/// Directory entries are re-read in growing windows until the title
/// terminator is found; this caps the largest window.
const MAX_ENTRY_SIZE: usize = 64 * 1024;

/// An open, validated ZIM archive
pub struct Archive {
    file: Mutex<File>,
    file_len: u64,
    header: ZimHeader,
    /// MIME type strings, indexed by a directory entry's mimetype field
    mime_types: Vec<String>,
    /// Directory entry offsets in URL order
    url_pointers: Vec<u64>,
    /// URL-order indices sorted by title
    title_pointers: Vec<u32>,
    /// Cluster offsets in cluster order
    cluster_pointers: Vec<u64>,
    /// Decompressed clusters, keyed by cluster index
    cluster_cache: Mutex<LruCache<u32, Arc<Cluster>>>,
}

impl Archive {
    /// Open a ZIM archive, validating the header and loading the index
    /// tables. Fails with `CorruptArchive` if the file is not a supported
    /// ZIM file or any index lies outside the file bounds.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_cache(path, 16)
    }

    /// Open with an explicit decompressed-cluster cache capacity.
    pub fn open_with_cache(path: impl AsRef<Path>, cache_size: usize) -> Result<Self> {
        let mut file = File::open(path.as_ref())?;
        let file_len = file.metadata()?.len();

        let mut header_buf = [0u8; HEADER_SIZE];
        if file_len < HEADER_SIZE as u64 {
            return Err(CorpusError::CorruptArchive(format!(
                "file too short for header: {} bytes",
                file_len
            )));
        }
        file.read_exact(&mut header_buf)?;
        let header = ZimHeader::parse(&header_buf, file_len)?;

        let mime_types = Self::load_mime_types(&mut file, &header, file_len)?;
        let url_pointers = Self::load_url_pointers(&mut file, &header, file_len)?;
        let title_pointers = Self::load_title_pointers(&mut file, &header)?;
        let cluster_pointers = Self::load_cluster_pointers(&mut file, &header, file_len)?;

        let cache_size = NonZeroUsize::new(cache_size.max(1)).unwrap_or(NonZeroUsize::MIN);

        tracing::debug!(
            entries = header.entry_count,
            clusters = header.cluster_count,
            version = header.major_version,
            "archive opened"
        );

        Ok(Self {
            file: Mutex::new(file),
            file_len,
            header,
            mime_types,
            url_pointers,
            title_pointers,
            cluster_pointers,
            cluster_cache: Mutex::new(LruCache::new(cache_size)),
        })
    }

    // =========================================================================
    // Index Loading
    // =========================================================================

    /// MIME list: consecutive zero-terminated strings, ended by an empty one.
    fn load_mime_types(file: &mut File, header: &ZimHeader, file_len: u64) -> Result<Vec<String>> {
        file.seek(SeekFrom::Start(header.mime_list_pos))?;
        let limit = (file_len - header.mime_list_pos).min(64 * 1024) as usize;
        let mut buf = vec![0u8; limit];
        let mut read = 0;
        while read < limit {
            let n = file.read(&mut buf[read..])?;
            if n == 0 {
                break;
            }
            read += n;
        }
        buf.truncate(read);

        let mut types = Vec::new();
        let mut at = 0;
        loop {
            let end = buf[at..].iter().position(|&b| b == 0).ok_or_else(|| {
                CorpusError::CorruptArchive("unterminated MIME list".to_string())
            })?;
            if end == 0 {
                break;
            }
            let mime = std::str::from_utf8(&buf[at..at + end])
                .map_err(|_| CorpusError::CorruptArchive("non-UTF-8 MIME type".to_string()))?;
            types.push(mime.to_string());
            at += end + 1;
        }
        Ok(types)
    }

    fn load_url_pointers(file: &mut File, header: &ZimHeader, file_len: u64) -> Result<Vec<u64>> {
        file.seek(SeekFrom::Start(header.url_ptr_pos))?;
        let mut buf = vec![0u8; header.entry_count as usize * 8];
        file.read_exact(&mut buf)?;
        let mut pointers = Vec::with_capacity(header.entry_count as usize);
        for i in 0..header.entry_count as usize {
            let offset = read_u64(&buf, i * 8);
            if offset >= file_len {
                return Err(CorpusError::CorruptArchive(format!(
                    "directory entry {} offset {} past end of file",
                    i, offset
                )));
            }
            pointers.push(offset);
        }
        Ok(pointers)
    }

    fn load_title_pointers(file: &mut File, header: &ZimHeader) -> Result<Vec<u32>> {
        file.seek(SeekFrom::Start(header.title_ptr_pos))?;
        let mut buf = vec![0u8; header.entry_count as usize * 4];
        file.read_exact(&mut buf)?;
        let mut pointers = Vec::with_capacity(header.entry_count as usize);
        for i in 0..header.entry_count as usize {
            let index = read_u32(&buf, i * 4);
            if index >= header.entry_count {
                return Err(CorpusError::CorruptArchive(format!(
                    "title pointer {} references entry {} of {}",
                    i, index, header.entry_count
                )));
            }
            pointers.push(index);
        }
        Ok(pointers)
    }

    fn load_cluster_pointers(file: &mut File, header: &ZimHeader, file_len: u64) -> Result<Vec<u64>> {
        file.seek(SeekFrom::Start(header.cluster_ptr_pos))?;
        let mut buf = vec![0u8; header.cluster_count as usize * 8];
        file.read_exact(&mut buf)?;
        let mut pointers = Vec::with_capacity(header.cluster_count as usize);
        for i in 0..header.cluster_count as usize {
            let offset = read_u64(&buf, i * 8);
            if offset >= file_len {
                return Err(CorpusError::CorruptArchive(format!(
                    "cluster {} offset {} past end of file",
                    i, offset
                )));
            }
            pointers.push(offset);
        }
        Ok(pointers)
    }

    // =========================================================================
    // Entry Access
    // =========================================================================

    /// Number of directory entries in the archive
    pub fn entry_count(&self) -> u32 {
        self.header.entry_count
    }

    /// The parsed header
    pub fn header(&self) -> &ZimHeader {
        &self.header
    }

    /// MIME type string for a directory entry's mimetype index
    pub fn mime_type(&self, index: u16) -> Option<&str> {
        self.mime_types.get(index as usize).map(String::as_str)
    }

    /// Parse the directory entry at URL-order position `index`.
    pub fn directory_entry(&self, index: u32) -> Result<DirectoryEntry> {
        let offset = *self.url_pointers.get(index as usize).ok_or_else(|| {
            CorpusError::CorruptArchive(format!(
                "entry index {} out of range ({} entries)",
                index, self.header.entry_count
            ))
        })?;

        // Entry length is not stored; retry with a larger window if the
        // strings do not terminate within the first one.
        let mut window = 1024;
        loop {
            let buf = self.read_at(offset, window)?;
            match DirectoryEntry::parse(&buf) {
                Ok(entry) => return Ok(entry),
                Err(err) => {
                    let capped = buf.len() == window;
                    if capped && window < MAX_ENTRY_SIZE {
                        window = (window * 8).min(MAX_ENTRY_SIZE);
                        continue;
                    }
                    return Err(err);
                }
            }
        }
    }

    /// URL-order index of the entry at title-order position `index`.
    pub fn entry_index_by_title(&self, index: u32) -> Option<u32> {
        self.title_pointers.get(index as usize).copied()
    }

    /// Lazy iterator over main-namespace HTML articles, in directory order.
    /// Each call starts a fresh pass.
    pub fn articles(&self) -> ArticleIter<'_> {
        ArticleIter::new(self)
    }

    // =========================================================================
    // Payload Resolution
    // =========================================================================

    /// Resolve an article entry to its decompressed payload bytes.
    ///
    /// Decompression failures are per-cluster and non-fatal to the run; the
    /// cache never holds a failed cluster.
    pub fn resolve_payload(&self, entry: &ArticleEntry) -> Result<Bytes> {
        let cluster = self.cluster(entry.cluster_index)?;
        cluster.blob(entry.blob_index)
    }

    /// Fetch a decompressed cluster, from cache if possible.
    fn cluster(&self, index: u32) -> Result<Arc<Cluster>> {
        if let Some(cluster) = self.cluster_cache.lock().get(&index) {
            return Ok(Arc::clone(cluster));
        }

        let start = *self.cluster_pointers.get(index as usize).ok_or_else(|| {
            CorpusError::Decompression(format!(
                "cluster index {} out of range ({} clusters)",
                index, self.header.cluster_count
            ))
        })?;
        // Cluster pointers are ascending in well-formed archives; fall back
        // to end of file when the next pointer does not help.
        let end = self
            .cluster_pointers
            .get(index as usize + 1)
            .copied()
            .filter(|&next| next > start)
            .unwrap_or(self.file_len);

        let raw = self.read_at(start, (end - start) as usize)?;
        let cluster = Arc::new(Cluster::parse(&raw)?);
        self.cluster_cache.lock().put(index, Arc::clone(&cluster));
        Ok(cluster)
    }

    /// Read up to `len` bytes at `offset`, clamped to the end of the file.
    fn read_at(&self, offset: u64, len: usize) -> Result<Vec<u8>> {
        let available = self.file_len.saturating_sub(offset).min(len as u64) as usize;
        let mut buf = vec![0u8; available];
        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(&mut buf)?;
        Ok(buf)
    }
}
