//! Pipeline configuration
//!
//! Every field has a default, so a JSON config file only needs the values it
//! overrides.

use crate::error::{Error, Result};
use crate::nlp::TermFrequency;
use crate::sentiment::lexicon::NRC_EMOTIONS;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Text normalization options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    pub remove_punctuation: bool,
    pub remove_symbols: bool,
    pub remove_numbers: bool,
    /// Apply Snowball English stemming
    pub stem: bool,
    /// Smallest and largest n-gram size
    pub ngram_range: (usize, usize),
    /// Joins the tokens of an n-gram
    pub ngram_separator: String,
    /// Start from the built-in English stopword list
    pub english_stopwords: bool,
    /// Additional stopwords; `name*` removes every token starting with `name`
    pub extra_stopwords: Vec<String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            remove_punctuation: true,
            remove_symbols: true,
            remove_numbers: true,
            stem: true,
            ngram_range: (1, 1),
            ngram_separator: "_".to_string(),
            english_stopwords: true,
            extra_stopwords: Vec::new(),
        }
    }
}

/// Configuration of the whole analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub normalizer: NormalizerConfig,
    /// Drop terms occurring fewer times than this across all reviews
    pub min_termfreq: usize,
    /// Drop terms occurring in fewer reviews than this
    pub min_docfreq: usize,
    /// Term-frequency variant for TF-IDF
    pub tfidf_scheme: TermFrequency,
    /// Logarithm base of the inverse document frequency
    pub idf_base: f64,
    /// Scores at or above this are "high", below are "low"
    pub high_score_threshold: u8,
    /// Naive Bayes additive smoothing
    pub alpha: f64,
    /// Probability that a review lands in the training set
    pub train_fraction: f64,
    /// Seed of the train/test split
    pub seed: u64,
    /// Lexicon categories to score
    pub categories: Vec<String>,
    /// Number of top terms to report
    pub top_n: usize,
    /// Input field delimiter
    pub delimiter: char,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            normalizer: NormalizerConfig::default(),
            min_termfreq: 2,
            min_docfreq: 1,
            tfidf_scheme: TermFrequency::Proportion,
            idf_base: 10.0,
            high_score_threshold: 4,
            alpha: 1.0,
            train_fraction: 0.8,
            seed: 42,
            categories: NRC_EMOTIONS.iter().map(|c| c.to_string()).collect(),
            top_n: 10,
            delimiter: ',',
        }
    }
}

impl PipelineConfig {
    /// Load and validate a JSON config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)?;
        let config: PipelineConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Save as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(&path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn with_normalizer(mut self, normalizer: NormalizerConfig) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_trim(mut self, min_termfreq: usize, min_docfreq: usize) -> Self {
        self.min_termfreq = min_termfreq;
        self.min_docfreq = min_docfreq;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_train_fraction(mut self, fraction: f64) -> Self {
        self.train_fraction = fraction;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_categories<S: AsRef<str>>(mut self, categories: &[S]) -> Self {
        self.categories = categories.iter().map(|c| c.as_ref().to_string()).collect();
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Input delimiter as a byte
    pub fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(Error::Config(format!(
                "delimiter must be ASCII, got '{}'",
                self.delimiter
            )))
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        let (min, max) = self.normalizer.ngram_range;
        if min == 0 || min > max {
            return Err(Error::Config(format!("invalid n-gram range ({}, {})", min, max)));
        }
        if !(self.train_fraction > 0.0 && self.train_fraction <= 1.0) {
            return Err(Error::Config(format!(
                "train_fraction must be in (0, 1], got {}",
                self.train_fraction
            )));
        }
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(Error::Config(format!("alpha must be positive, got {}", self.alpha)));
        }
        if !(1..=5).contains(&self.high_score_threshold) {
            return Err(Error::Config(format!(
                "high_score_threshold must be in 1..=5, got {}",
                self.high_score_threshold
            )));
        }
        if !(self.idf_base.is_finite() && self.idf_base > 0.0 && self.idf_base != 1.0) {
            return Err(Error::Config(format!("invalid idf_base {}", self.idf_base)));
        }
        self.delimiter_byte()?;
        Ok(())
    }
}
