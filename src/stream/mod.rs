//! Streaming intermediate record format
//!
//! One record per article: the title and its accepted sentences, framed as
//! escaped lines so any content round-trips unambiguously. The writer is
//! generic over a byte sink (typically a gzip encoder), the reader over a
//! buffered byte source, and neither holds more than one record in memory.
//!
//! ## Wire Format
//! ```text
//! T <escaped title>\n
//! S <escaped sentence>\n
//! S <escaped sentence>\n
//! T <escaped title>\n        ← next record starts here
//! ...
//! ```

mod reader;
mod record;
mod writer;

pub use reader::RecordReader;
pub use record::{escape, unescape, TextRecord};
pub use writer::RecordWriter;
