//! zimcorpus Extract Binary
//!
//! Extracts a gzipped record stream from a Wikipedia ZIM archive.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::process;

use clap::Parser;
use flate2::write::GzEncoder;
use flate2::Compression;
use tracing_subscriber::{fmt, EnvFilter};

use zimcorpus::{Archive, Config, Extractor};

/// zimcorpus extractor
#[derive(Parser, Debug)]
#[command(name = "zimcorpus-extract")]
#[command(about = "Extract a deduplicated sentence corpus from a ZIM archive")]
#[command(version)]
struct Args {
    /// ZIM input path
    input: String,

    /// Gzipped record stream output path
    output: String,

    /// Worker threads for HTML simplification and segmentation
    #[arg(short, long, default_value = "4")]
    workers: usize,

    /// Minimum accepted sentence length, in characters
    #[arg(long, default_value = "8")]
    min_sentence_chars: usize,

    /// Maximum accepted sentence length, in characters
    #[arg(long, default_value = "1000")]
    max_sentence_chars: usize,

    /// Decompressed clusters kept cached
    #[arg(long, default_value = "16")]
    cluster_cache: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,zimcorpus=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let args = Args::parse();

    tracing::info!("zimcorpus-extract v{}", zimcorpus::VERSION);
    tracing::info!("Input archive: {}", args.input);
    tracing::info!("Output stream: {}", args.output);

    let config = Config::builder()
        .worker_threads(args.workers)
        .min_sentence_chars(args.min_sentence_chars)
        .max_sentence_chars(args.max_sentence_chars)
        .cluster_cache_size(args.cluster_cache)
        .build();

    if let Err(err) = run(&args, config) {
        tracing::error!("extraction failed: {}", err);
        process::exit(1);
    }
}

fn run(args: &Args, config: Config) -> zimcorpus::Result<()> {
    let archive = Archive::open_with_cache(&args.input, config.cluster_cache_size)?;
    let mut sink = GzEncoder::new(
        BufWriter::new(File::create(&args.output)?),
        Compression::best(),
    );

    let extractor = Extractor::new(config)?;
    let stats = extractor.run(&archive, &mut sink)?;

    // Finish the gzip stream explicitly; Drop would discard a footer or
    // flush error and leave a silently truncated output file.
    sink.finish()?.flush()?;

    tracing::info!(
        "done: {} records, {} sentences ({} duplicates dropped, {} markup skips, {} cluster skips)",
        stats.records_written,
        stats.sentences_written,
        stats.sentences_deduplicated,
        stats.skipped_markup,
        stats.skipped_decompression,
    );
    Ok(())
}
