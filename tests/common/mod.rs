//! Synthetic ZIM archives for tests
//!
//! Builds small but structurally complete archives: header, MIME list,
//! directory entries, the three pointer tables, and clusters in any of the
//! supported compression modes.

use std::io::Read;

/// Directory entry to synthesize
pub enum Entry {
    Article {
        namespace: u8,
        url: &'static str,
        title: &'static str,
        /// Index into the builder's MIME list
        mime: u16,
        cluster: u32,
        blob: u32,
    },
    Redirect {
        namespace: u8,
        url: &'static str,
        title: &'static str,
        target: u32,
    },
}

/// Cluster compression for the builder
#[derive(Clone, Copy)]
pub enum ClusterMode {
    Plain,
    /// Uncompressed with a 64-bit blob offset table
    PlainExtended,
    Xz,
    Zstd,
}

pub struct ClusterSpec {
    pub mode: ClusterMode,
    pub blobs: Vec<Vec<u8>>,
}

#[derive(Default)]
pub struct ZimBuilder {
    mime_types: Vec<String>,
    entries: Vec<Entry>,
    clusters: Vec<ClusterSpec>,
}

impl ZimBuilder {
    pub fn new() -> Self {
        Self {
            mime_types: vec!["text/html".to_string(), "text/plain".to_string()],
            entries: Vec::new(),
            clusters: Vec::new(),
        }
    }

    /// MIME index of "text/html" in the default list
    pub const MIME_HTML: u16 = 0;
    /// MIME index of "text/plain" in the default list
    pub const MIME_PLAIN: u16 = 1;

    /// Append a MIME string after the defaults; entries reference it by its
    /// list index (the defaults occupy 0 and 1).
    pub fn mime(mut self, mime: &str) -> Self {
        self.mime_types.push(mime.to_string());
        self
    }

    pub fn entry(mut self, entry: Entry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn cluster(mut self, mode: ClusterMode, blobs: Vec<Vec<u8>>) -> Self {
        self.clusters.push(ClusterSpec { mode, blobs });
        self
    }

    /// Serialize the archive to bytes.
    pub fn build(self) -> Vec<u8> {
        // MIME list
        let mut mime_list = Vec::new();
        for mime in &self.mime_types {
            mime_list.extend_from_slice(mime.as_bytes());
            mime_list.push(0);
        }
        mime_list.push(0);

        // Directory entries, offsets recorded relative to their block
        let mut entry_block = Vec::new();
        let mut entry_offsets = Vec::new();
        for entry in &self.entries {
            entry_offsets.push(entry_block.len() as u64);
            encode_entry(entry, &mut entry_block);
        }

        // Clusters
        let mut cluster_block = Vec::new();
        let mut cluster_offsets = Vec::new();
        for cluster in &self.clusters {
            cluster_offsets.push(cluster_block.len() as u64);
            encode_cluster(cluster, &mut cluster_block);
        }

        // Layout: header | mime | entries | url ptrs | title ptrs | cluster ptrs | clusters
        let mime_list_pos = 80u64;
        let entries_pos = mime_list_pos + mime_list.len() as u64;
        let url_ptr_pos = entries_pos + entry_block.len() as u64;
        let title_ptr_pos = url_ptr_pos + self.entries.len() as u64 * 8;
        let cluster_ptr_pos = title_ptr_pos + self.entries.len() as u64 * 4;
        let clusters_pos = cluster_ptr_pos + self.clusters.len() as u64 * 8;

        let mut out = Vec::new();
        // Header
        out.extend_from_slice(&72_173_914u32.to_le_bytes()); // magic
        out.extend_from_slice(&5u16.to_le_bytes()); // major version
        out.extend_from_slice(&0u16.to_le_bytes()); // minor version
        out.extend_from_slice(&[0u8; 16]); // uuid
        out.extend_from_slice(&(self.entries.len() as u32).to_le_bytes());
        out.extend_from_slice(&(self.clusters.len() as u32).to_le_bytes());
        out.extend_from_slice(&url_ptr_pos.to_le_bytes());
        out.extend_from_slice(&title_ptr_pos.to_le_bytes());
        out.extend_from_slice(&cluster_ptr_pos.to_le_bytes());
        out.extend_from_slice(&mime_list_pos.to_le_bytes());
        out.extend_from_slice(&0xffff_ffffu32.to_le_bytes()); // main page
        out.extend_from_slice(&0xffff_ffffu32.to_le_bytes()); // layout page
        out.extend_from_slice(&0u64.to_le_bytes()); // checksum pos
        assert_eq!(out.len(), 80);

        out.extend_from_slice(&mime_list);
        out.extend_from_slice(&entry_block);
        for offset in &entry_offsets {
            out.extend_from_slice(&(entries_pos + offset).to_le_bytes());
        }
        // Title order = URL order for these fixtures
        for i in 0..self.entries.len() as u32 {
            out.extend_from_slice(&i.to_le_bytes());
        }
        for offset in &cluster_offsets {
            out.extend_from_slice(&(clusters_pos + offset).to_le_bytes());
        }
        out.extend_from_slice(&cluster_block);
        out
    }
}

fn encode_entry(entry: &Entry, out: &mut Vec<u8>) {
    match entry {
        Entry::Article {
            namespace,
            url,
            title,
            mime,
            cluster,
            blob,
        } => {
            out.extend_from_slice(&mime.to_le_bytes());
            out.push(0); // parameter length
            out.push(*namespace);
            out.extend_from_slice(&0u32.to_le_bytes()); // revision
            out.extend_from_slice(&cluster.to_le_bytes());
            out.extend_from_slice(&blob.to_le_bytes());
            out.extend_from_slice(url.as_bytes());
            out.push(0);
            out.extend_from_slice(title.as_bytes());
            out.push(0);
        }
        Entry::Redirect {
            namespace,
            url,
            title,
            target,
        } => {
            out.extend_from_slice(&0xffffu16.to_le_bytes());
            out.push(0);
            out.push(*namespace);
            out.extend_from_slice(&0u32.to_le_bytes());
            out.extend_from_slice(&target.to_le_bytes());
            out.extend_from_slice(url.as_bytes());
            out.push(0);
            out.extend_from_slice(title.as_bytes());
            out.push(0);
        }
    }
}

fn encode_cluster(cluster: &ClusterSpec, out: &mut Vec<u8>) {
    // Offset table followed by blob data, offsets relative to payload start
    let extended = matches!(cluster.mode, ClusterMode::PlainExtended);
    let width = if extended { 8 } else { 4 };
    let table_len = (cluster.blobs.len() + 1) * width;
    let mut payload = Vec::new();
    let mut offset = table_len as u64;
    push_offset(&mut payload, offset, extended);
    for blob in &cluster.blobs {
        offset += blob.len() as u64;
        push_offset(&mut payload, offset, extended);
    }
    for blob in &cluster.blobs {
        payload.extend_from_slice(blob);
    }

    match cluster.mode {
        ClusterMode::Plain => {
            out.push(1);
            out.extend_from_slice(&payload);
        }
        ClusterMode::PlainExtended => {
            out.push(0x11); // no compression, extended offsets flag
            out.extend_from_slice(&payload);
        }
        ClusterMode::Xz => {
            out.push(4);
            let mut encoded = Vec::new();
            xz2::read::XzEncoder::new(&payload[..], 6)
                .read_to_end(&mut encoded)
                .unwrap();
            out.extend_from_slice(&encoded);
        }
        ClusterMode::Zstd => {
            out.push(5);
            let encoded = zstd::encode_all(&payload[..], 0).unwrap();
            out.extend_from_slice(&encoded);
        }
    }
}

fn push_offset(payload: &mut Vec<u8>, offset: u64, extended: bool) {
    if extended {
        payload.extend_from_slice(&offset.to_le_bytes());
    } else {
        payload.extend_from_slice(&(offset as u32).to_le_bytes());
    }
}

/// Write a built archive into a temp directory and return its path.
pub fn write_archive(dir: &tempfile::TempDir, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join("test.zim");
    std::fs::write(&path, bytes).unwrap();
    path
}

/// A small HTML article body wrapped in Wikipedia's content container.
pub fn wiki_html(body: &str) -> Vec<u8> {
    format!(
        "<html><head><title>t</title></head><body><div id=\"mw-content-text\">{}</div></body></html>",
        body
    )
    .into_bytes()
}
