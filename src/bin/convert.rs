//! zimcorpus Convert Binary
//!
//! Flattens a gzipped record stream into plain text, one sentence per line,
//! discarding article titles.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::process;

use clap::Parser;
use flate2::read::GzDecoder;
use tracing_subscriber::{fmt, EnvFilter};

use zimcorpus::RecordReader;

/// zimcorpus converter
#[derive(Parser, Debug)]
#[command(name = "zimcorpus-convert")]
#[command(about = "Convert a record stream to one-sentence-per-line text")]
#[command(version)]
struct Args {
    /// Gzipped record stream input path
    input: String,

    /// Plain text output path (UTF-8, one sentence per line)
    output: String,
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

    tracing::info!("zimcorpus-convert v{}", zimcorpus::VERSION);
    tracing::info!("Input stream: {}", args.input);
    tracing::info!("Output text: {}", args.output);

    if let Err(err) = run(&args) {
        tracing::error!("conversion failed: {}", err);
        process::exit(1);
    }
}

fn run(args: &Args) -> zimcorpus::Result<()> {
    let source = BufReader::new(GzDecoder::new(BufReader::new(File::open(&args.input)?)));
    let mut output = BufWriter::new(File::create(&args.output)?);

    let mut records = 0u64;
    let mut sentences = 0u64;
    for record in RecordReader::new(source) {
        let record = record?;
        for sentence in &record.sentences {
            output.write_all(sentence.as_bytes())?;
            output.write_all(b"\n")?;
            sentences += 1;
        }
        records += 1;
    }
    output.flush()?;

    tracing::info!("done: {} records flattened into {} lines", records, sentences);
    Ok(())
}
