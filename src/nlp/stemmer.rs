//! Stemming
//!
//! The stemming algorithm is pluggable through [`TokenStemmer`]; the default
//! is the Snowball English stemmer from `rust-stemmers`.

use rust_stemmers::{Algorithm, Stemmer};

/// Reduces a token to its stem
pub trait TokenStemmer: Send + Sync {
    fn stem(&self, token: &str) -> String;
}

/// Snowball (Porter2) English stemmer
pub struct SnowballStemmer {
    inner: Stemmer,
}

impl SnowballStemmer {
    pub fn english() -> Self {
        Self {
            inner: Stemmer::create(Algorithm::English),
        }
    }
}

impl Default for SnowballStemmer {
    fn default() -> Self {
        Self::english()
    }
}

impl std::fmt::Debug for SnowballStemmer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SnowballStemmer(English)")
    }
}

impl TokenStemmer for SnowballStemmer {
    fn stem(&self, token: &str) -> String {
        self.inner.stem(token).into_owned()
    }
}

/// Leaves tokens untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityStemmer;

impl TokenStemmer for IdentityStemmer {
    fn stem(&self, token: &str) -> String {
        token.to_string()
    }
}
