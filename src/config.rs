//! Configuration for zimcorpus
//!
//! Centralized configuration with sensible defaults. The segmentation bounds
//! and the abbreviation exception list are policy constants: they are exposed
//! here so they can be inspected and tuned rather than buried in the
//! segmenter.

/// Default abbreviations whose trailing period never ends a sentence.
///
/// Stored case-folded, terminator included. Single-letter initials
/// ("J. R. R. Tolkien") are handled by a separate rule in the segmenter and
/// do not need to be listed.
pub const DEFAULT_ABBREVIATIONS: &[&str] = &[
    // Honorifics and titles
    "dr.", "mr.", "mrs.", "ms.", "prof.", "rev.", "gen.", "sen.", "rep.",
    "st.", "sgt.", "capt.", "lt.", "col.", "cmdr.",
    // Time and measure
    "a.m.", "p.m.", "no.", "vol.", "pp.", "ed.", "approx.", "est.",
    // Months
    "jan.", "feb.", "mar.", "apr.", "jun.", "jul.", "aug.", "sep.", "sept.",
    "oct.", "nov.", "dec.",
    // Latin connectives
    "etc.", "e.g.", "i.e.", "cf.", "vs.", "et al.",
];

/// Main configuration for an extraction run
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Segmentation Configuration
    // -------------------------------------------------------------------------
    /// Minimum accepted sentence length, in characters (shorter candidates
    /// are fragments and are dropped)
    pub min_sentence_chars: usize,

    /// Maximum accepted sentence length, in characters (longer candidates
    /// are run-on junk, usually mis-simplified markup)
    pub max_sentence_chars: usize,

    /// Abbreviations whose trailing period is non-terminal, case-folded,
    /// terminator included (e.g. "dr.", "p.m.")
    pub abbreviations: Vec<String>,

    // -------------------------------------------------------------------------
    // Pipeline Configuration
    // -------------------------------------------------------------------------
    /// Number of worker threads simplifying and segmenting articles
    pub worker_threads: usize,

    /// Decompressed clusters kept in the archive's LRU cache
    pub cluster_cache_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_sentence_chars: 8,
            max_sentence_chars: 1000,
            abbreviations: DEFAULT_ABBREVIATIONS.iter().map(|s| s.to_string()).collect(),
            worker_threads: 4,
            cluster_cache_size: 16,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validate invariants between fields
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.min_sentence_chars > self.max_sentence_chars {
            return Err(crate::error::CorpusError::Config(format!(
                "min_sentence_chars ({}) exceeds max_sentence_chars ({})",
                self.min_sentence_chars, self.max_sentence_chars
            )));
        }
        if self.worker_threads == 0 {
            return Err(crate::error::CorpusError::Config(
                "worker_threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the minimum accepted sentence length (in characters)
    pub fn min_sentence_chars(mut self, chars: usize) -> Self {
        self.config.min_sentence_chars = chars;
        self
    }

    /// Set the maximum accepted sentence length (in characters)
    pub fn max_sentence_chars(mut self, chars: usize) -> Self {
        self.config.max_sentence_chars = chars;
        self
    }

    /// Replace the abbreviation exception list
    pub fn abbreviations<I, S>(mut self, abbreviations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.abbreviations = abbreviations.into_iter().map(Into::into).collect();
        self
    }

    /// Set the number of worker threads
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count;
        self
    }

    /// Set the decompressed-cluster cache capacity
    pub fn cluster_cache_size(mut self, clusters: usize) -> Self {
        self.config.cluster_cache_size = clusters;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
