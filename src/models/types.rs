//! Data types shared across the pipeline

use serde::{Deserialize, Serialize};

/// One app-store review that survived loading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// App the review was written for
    pub app: String,
    /// Review text (ASCII only)
    pub content: String,
    /// Leading component of the app version the review was created on
    pub version: u32,
    /// Star rating, 1..=5
    pub score: u8,
}

impl Review {
    /// Binarized rating using the given "high" threshold
    pub fn rating_class(&self, high_threshold: u8) -> RatingClass {
        RatingClass::from_score(self.score, high_threshold)
    }
}

/// Binarized rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RatingClass {
    /// Score at or above the threshold
    High,
    /// Score below the threshold
    Low,
}

impl RatingClass {
    /// Canonical label order used by the classifier and the confusion matrix
    pub const LABELS: [&'static str; 2] = ["high", "low"];

    pub fn from_score(score: u8, high_threshold: u8) -> Self {
        if score >= high_threshold {
            RatingClass::High
        } else {
            RatingClass::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RatingClass::High => "high",
            RatingClass::Low => "low",
        }
    }
}

impl std::fmt::Display for RatingClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized token sequence of one review.
///
/// Token order is preserved (n-grams depend on it), although downstream
/// consumers treat the document as a bag of words.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub tokens: Vec<String>,
}

impl Document {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterate over tokens; can be called any number of times
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.tokens.iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl From<Vec<String>> for Document {
    fn from(tokens: Vec<String>) -> Self {
        Self { tokens }
    }
}

/// Term with an associated weight (frequency, probability, TF-IDF...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTerm {
    pub term: String,
    pub score: f64,
}
