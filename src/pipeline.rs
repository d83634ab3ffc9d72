//! Extraction pipeline
//!
//! Coordinates the whole run: a producer iterates selected articles and
//! resolves their payloads (sequential access keeps the cluster cache hot),
//! a bounded worker pool simplifies and segments independent articles in
//! parallel, and a single writer role owns the dedup set and the record
//! stream.
//!
//! ## Concurrency Model: Fan-Out / Single-Writer
//!
//! ```text
//! producer ──▶ work channel ──▶ workers (simplify + segment)
//!     │                             │
//!     └── payload failures ──▶ outcome channel ◀──┘
//!                                   │
//!                                   ▼
//!                writer role: reorder by sequence number,
//!                dedup-check-and-insert, stream write
//! ```
//!
//! Workers may finish out of order; the writer buffers outcomes and flushes
//! them in archive directory order, so output is byte-identical across runs.
//! A permit channel caps in-flight articles, so the reorder buffer cannot
//! grow past a fixed window even when one article is much slower than its
//! neighbors. Per-article and per-cluster failures are counted and logged,
//! never fatal.

use std::collections::BTreeMap;
use std::io::Write;

use bytes::Bytes;
use crossbeam::channel;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{CorpusError, Result};
use crate::segment::{DedupSet, Segmenter};
use crate::simplify::Simplifier;
use crate::stream::{RecordWriter, TextRecord};
use crate::zim::Archive;

/// In-flight articles per worker; bounds the writer's reorder buffer
const INFLIGHT_PER_WORKER: usize = 32;

/// One selected article handed to a worker
struct WorkItem {
    seq: u64,
    title: String,
    payload: Bytes,
}

/// Per-article result handed to the writer role
enum Outcome {
    /// Candidate sentences, not yet dedup-checked
    Candidates { title: String, sentences: Vec<String> },
    /// Payload could not be resolved (cluster decompression failure)
    SkippedPayload,
    /// Payload could not be parsed as markup
    SkippedMarkup,
}

/// Counters summarizing a completed run; the only externally observable
/// trace of recovered failures.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractStats {
    /// Articles that passed selection
    pub articles_selected: u64,
    /// Records actually written (articles with at least one surviving sentence)
    pub records_written: u64,
    /// Articles skipped because their cluster failed to decompress
    pub skipped_decompression: u64,
    /// Articles skipped because their markup could not be parsed
    pub skipped_markup: u64,
    /// Sentences written to the stream
    pub sentences_written: u64,
    /// Sentence candidates dropped as duplicates
    pub sentences_deduplicated: u64,
}

/// Runs the extraction pipeline over an archive
pub struct Extractor {
    config: Config,
}

impl Extractor {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Extract every selectable article from `archive`, writing the record
    /// stream to `sink`. Returns run statistics.
    pub fn run<W: Write>(&self, archive: &Archive, sink: W) -> Result<ExtractStats> {
        let workers = self.config.worker_threads;
        info!(workers, entries = archive.entry_count(), "starting extraction");

        let (work_tx, work_rx) = channel::bounded::<WorkItem>(workers * 2);
        let (outcome_tx, outcome_rx) = channel::bounded::<(u64, Outcome)>(workers * 2);

        let scope_result = crossbeam::thread::scope(|scope| -> Result<ExtractStats> {
            // Every in-flight article holds one permit from producer pickup
            // until the writer retires its sequence number. The sender lives
            // in this closure, so an early writer exit drops it and unblocks
            // a waiting producer.
            let window = workers * INFLIGHT_PER_WORKER;
            let (permit_tx, permit_rx) = channel::bounded::<()>(window);
            for _ in 0..window {
                let _ = permit_tx.send(());
            }

            // Producer: directory-order iteration and payload resolution.
            let producer_outcome_tx = outcome_tx.clone();
            scope.spawn(move |_| {
                let mut seq = 0u64;
                for (index, entry) in archive.articles() {
                    if permit_rx.recv().is_err() {
                        break;
                    }
                    let title = if entry.title.is_empty() {
                        entry.url.clone()
                    } else {
                        entry.title.clone()
                    };
                    match archive.resolve_payload(&entry) {
                        Ok(payload) => {
                            let item = WorkItem { seq, title, payload };
                            if work_tx.send(item).is_err() {
                                break;
                            }
                        }
                        Err(err) => {
                            warn!(index, url = %entry.url, %err, "skipping entry: payload unavailable");
                            if producer_outcome_tx.send((seq, Outcome::SkippedPayload)).is_err() {
                                break;
                            }
                        }
                    }
                    seq += 1;
                }
            });

            // Workers: simplify and segment, no shared mutable state.
            for _ in 0..workers {
                let work_rx = work_rx.clone();
                let outcome_tx = outcome_tx.clone();
                let segmenter = Segmenter::new(&self.config);
                scope.spawn(move |_| {
                    let simplifier = Simplifier::new();
                    for item in work_rx.iter() {
                        let outcome = match simplifier.simplify(&item.payload) {
                            Ok(units) => {
                                let sentences = units
                                    .iter()
                                    .flat_map(|unit| segmenter.segment(unit))
                                    .collect();
                                Outcome::Candidates {
                                    title: item.title,
                                    sentences,
                                }
                            }
                            Err(err) => {
                                warn!(title = %item.title, %err, "skipping article: markup unparseable");
                                Outcome::SkippedMarkup
                            }
                        };
                        if outcome_tx.send((item.seq, outcome)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(work_rx);
            drop(outcome_tx);

            // Writer role: the only place touching the dedup set and the
            // stream. Buffers out-of-order outcomes and flushes in sequence.
            let mut writer = RecordWriter::new(sink);
            let mut dedup = DedupSet::new();
            let mut stats = ExtractStats::default();
            let mut pending: BTreeMap<u64, Outcome> = BTreeMap::new();
            let mut next_seq = 0u64;

            // Consumes the receiver, so an early error drops it and unblocks
            // any worker still sending.
            for (seq, outcome) in outcome_rx.into_iter() {
                pending.insert(seq, outcome);
                while let Some(outcome) = pending.remove(&next_seq) {
                    next_seq += 1;
                    stats.articles_selected += 1;
                    Self::apply(outcome, &mut writer, &mut dedup, &mut stats)?;
                    // Return the permit; fails only once the producer is gone.
                    let _ = permit_tx.send(());
                }
            }
            // Sequence numbers are dense, so nothing can remain buffered.
            debug_assert!(pending.is_empty());

            writer.flush()?;
            info!(
                records = stats.records_written,
                sentences = stats.sentences_written,
                deduplicated = stats.sentences_deduplicated,
                skipped_markup = stats.skipped_markup,
                skipped_decompression = stats.skipped_decompression,
                "extraction complete"
            );
            Ok(stats)
        });

        match scope_result {
            Ok(inner) => inner,
            Err(_) => Err(CorpusError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "pipeline thread panicked",
            ))),
        }
    }

    /// Dedup-check-and-insert plus stream write, under the writer role's
    /// exclusive ownership.
    fn apply<W: Write>(
        outcome: Outcome,
        writer: &mut RecordWriter<W>,
        dedup: &mut DedupSet,
        stats: &mut ExtractStats,
    ) -> Result<()> {
        match outcome {
            Outcome::SkippedPayload => {
                stats.skipped_decompression += 1;
            }
            Outcome::SkippedMarkup => {
                stats.skipped_markup += 1;
            }
            Outcome::Candidates { title, sentences } => {
                let mut kept = Vec::with_capacity(sentences.len());
                for sentence in sentences {
                    if dedup.insert(&sentence) {
                        kept.push(sentence);
                    } else {
                        stats.sentences_deduplicated += 1;
                    }
                }
                if kept.is_empty() {
                    debug!(title = %title, "no surviving sentences, record elided");
                } else {
                    stats.sentences_written += kept.len() as u64;
                    stats.records_written += 1;
                    writer.write_record(&TextRecord::new(title, kept))?;
                }
            }
        }
        Ok(())
    }
}
