//! Text preprocessing: tokenization, stopword removal, stemming, n-grams
//!
//! Turns raw review content into a normalized [`Document`].

use crate::config::NormalizerConfig;
use crate::error::{Error, Result};
use crate::models::Document;
use crate::nlp::stemmer::{SnowballStemmer, TokenStemmer};
use crate::nlp::stopwords::StopwordSet;
use crate::nlp::tokenizer::Tokenizer;
use std::sync::Arc;

/// Text preprocessor
#[derive(Clone)]
pub struct Preprocessor {
    tokenizer: Tokenizer,
    stopwords: StopwordSet,
    stemmer: Option<Arc<dyn TokenStemmer>>,
    ngram_range: (usize, usize),
    ngram_separator: String,
}

impl Preprocessor {
    /// English stopwords, Snowball stemming, unigrams only
    pub fn new() -> Self {
        Self {
            tokenizer: Tokenizer::new(),
            stopwords: StopwordSet::english(),
            stemmer: Some(Arc::new(SnowballStemmer::english())),
            ngram_range: (1, 1),
            ngram_separator: "_".to_string(),
        }
    }

    /// Build a preprocessor from configuration
    pub fn from_config(config: &NormalizerConfig) -> Result<Self> {
        let base = if config.english_stopwords {
            StopwordSet::english()
        } else {
            StopwordSet::new()
        };
        let stopwords = base.with_patterns(config.extra_stopwords.as_slice())?;

        let tokenizer = Tokenizer::new()
            .remove_punctuation(config.remove_punctuation)
            .remove_symbols(config.remove_symbols)
            .remove_numbers(config.remove_numbers);

        Self::new()
            .with_tokenizer(tokenizer)
            .with_stopwords(stopwords)
            .with_stemming(config.stem)
            .with_ngram_separator(&config.ngram_separator)
            .with_ngram_range(config.ngram_range.0, config.ngram_range.1)
    }

    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn with_stopwords(mut self, stopwords: StopwordSet) -> Self {
        self.stopwords = stopwords;
        self
    }

    /// Enable Snowball stemming or disable stemming altogether
    pub fn with_stemming(mut self, stem: bool) -> Self {
        self.stemmer = if stem {
            Some(Arc::new(SnowballStemmer::english()))
        } else {
            None
        };
        self
    }

    /// Use a custom stemmer
    pub fn with_stemmer(mut self, stemmer: Arc<dyn TokenStemmer>) -> Self {
        self.stemmer = Some(stemmer);
        self
    }

    /// Emit n-grams for every n in `min..=max`; unigrams are kept only when `min == 1`
    pub fn with_ngram_range(mut self, min: usize, max: usize) -> Result<Self> {
        if min == 0 || min > max {
            return Err(Error::Config(format!(
                "invalid n-gram range ({}, {})",
                min, max
            )));
        }
        self.ngram_range = (min, max);
        Ok(self)
    }

    pub fn with_ngram_separator(mut self, separator: &str) -> Self {
        self.ngram_separator = separator.to_string();
        self
    }

    /// Active stemmer, if stemming is enabled
    pub fn stemmer(&self) -> Option<&dyn TokenStemmer> {
        self.stemmer.as_deref()
    }

    pub fn ngram_range(&self) -> (usize, usize) {
        self.ngram_range
    }

    /// Apply stopword removal, stemming and n-gram expansion to tokens
    pub fn process(&self, tokens: &[String]) -> Vec<String> {
        let kept: Vec<String> = tokens
            .iter()
            .filter(|t| !self.stopwords.is_stopword(t))
            .map(|t| match &self.stemmer {
                Some(stemmer) => stemmer.stem(t),
                None => t.clone(),
            })
            .filter(|t| !t.is_empty())
            .collect();

        let (min, max) = self.ngram_range;
        if min == 1 && max == 1 {
            return kept;
        }

        let mut features = Vec::new();
        for n in min..=max {
            if n == 1 {
                features.extend(kept.iter().cloned());
            } else {
                features.extend(ngrams(&kept, n, &self.ngram_separator));
            }
        }
        features
    }

    /// Normalize one text into a document
    pub fn normalize(&self, text: &str) -> Document {
        let tokens = self.tokenizer.tokenize(text);
        Document::new(self.process(&tokens))
    }

    /// Normalize many texts
    pub fn normalize_all<'a, I>(&self, texts: I) -> Vec<Document>
    where
        I: IntoIterator<Item = &'a str>,
    {
        texts.into_iter().map(|text| self.normalize(text)).collect()
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Preprocessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preprocessor")
            .field("tokenizer", &self.tokenizer)
            .field("stopwords", &self.stopwords.len())
            .field("stemming", &self.stemmer.is_some())
            .field("ngram_range", &self.ngram_range)
            .field("ngram_separator", &self.ngram_separator)
            .finish()
    }
}

/// Contiguous n-grams joined by `separator`
pub fn ngrams(tokens: &[String], n: usize, separator: &str) -> Vec<String> {
    if n == 0 || tokens.len() < n {
        return vec![];
    }

    tokens
        .windows(n)
        .map(|window| window.join(separator))
        .collect()
}
