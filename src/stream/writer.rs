//! Record stream writer
//!
//! Appends self-delimited records to any byte sink. The sink is typically a
//! compressing encoder; the writer itself is agnostic to container
//! compression.

use std::io::Write;

use crate::error::Result;
use super::record::{escape, TextRecord};

/// Writes [`TextRecord`]s to an underlying byte sink
pub struct RecordWriter<W: Write> {
    inner: W,
    records_written: u64,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            records_written: 0,
        }
    }

    /// Append one record to the stream.
    pub fn write_record(&mut self, record: &TextRecord) -> Result<()> {
        writeln!(self.inner, "T {}", escape(&record.title))?;
        for sentence in &record.sentences {
            writeln!(self.inner, "S {}", escape(sentence))?;
        }
        self.records_written += 1;
        Ok(())
    }

    /// Records appended so far
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Flush and hand back the sink (needed to finish compressing encoders).
    pub fn into_inner(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}
