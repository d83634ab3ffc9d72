//! Record stream reader
//!
//! Replays records lazily from any buffered byte source, one line at a
//! time; the whole corpus never has to fit in memory. Restartable from the
//! start by constructing a fresh reader over a fresh source. The iterator
//! reaches an explicit exhausted state at end of stream and stays there.

use std::io::BufRead;

use crate::error::{CorpusError, Result};
use super::record::{unescape, TextRecord};

/// Reads [`TextRecord`]s back from an underlying byte source
pub struct RecordReader<R: BufRead> {
    inner: R,
    /// Title line of the next record, already consumed from the source
    pending_title: Option<String>,
    exhausted: bool,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pending_title: None,
            exhausted: false,
        }
    }

    /// Read the next record, or `None` at end of stream.
    pub fn read_record(&mut self) -> Result<Option<TextRecord>> {
        if self.exhausted {
            return Ok(None);
        }

        let title = match self.pending_title.take() {
            Some(title) => title,
            None => match self.next_line()? {
                None => {
                    self.exhausted = true;
                    return Ok(None);
                }
                Some(line) => Self::parse_title(&line)?,
            },
        };

        let mut sentences = Vec::new();
        loop {
            match self.next_line()? {
                None => {
                    self.exhausted = true;
                    break;
                }
                Some(line) => {
                    if let Some(rest) = line.strip_prefix("S ") {
                        sentences.push(unescape(rest)?);
                    } else {
                        // Next record begins; keep its title for the
                        // following call.
                        self.pending_title = Some(Self::parse_title(&line)?);
                        break;
                    }
                }
            }
        }

        Ok(Some(TextRecord { title, sentences }))
    }

    fn parse_title(line: &str) -> Result<String> {
        match line.strip_prefix("T ") {
            Some(rest) => unescape(rest),
            None => Err(CorpusError::Stream(format!(
                "expected title line, got: {:?}",
                line.chars().take(40).collect::<String>()
            ))),
        }
    }

    /// Next non-empty line with the trailing newline stripped, or `None` at
    /// end of stream.
    fn next_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        loop {
            line.clear();
            let read = self.inner.read_line(&mut line)?;
            if read == 0 {
                return Ok(None);
            }
            while line.ends_with('\n') || line.ends_with('\r') {
                line.pop();
            }
            if !line.is_empty() {
                return Ok(Some(line));
            }
        }
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<TextRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(err) => {
                // Stop after a framing error instead of spinning on it.
                self.exhausted = true;
                Some(Err(err))
            }
        }
    }
}
