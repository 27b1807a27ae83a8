//! Error types for the review text-mining library

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Required input column is absent from the header row
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A single input row could not be turned into a review.
    ///
    /// Recovered inside the loader by dropping the row.
    #[error("Malformed row {line}: {reason}")]
    MalformedRow { line: u64, reason: RowRejection },

    /// A document-feature matrix has no columns
    #[error("Empty vocabulary: no features survived normalization and trimming")]
    EmptyVocabulary,

    /// Not enough labelled rows to train
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Two aligned sequences disagree in length
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Why the loader dropped a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowRejection {
    /// `reviewCreatedVersion` is empty
    EmptyVersion,
    /// Leading version component is not an unsigned integer
    UnparsableVersion,
    /// Content has a byte outside 1..=127
    NonAsciiContent,
    /// Score is not an integer in 1..=5
    InvalidScore,
    /// The CSV reader could not decode the record
    Undecodable,
}

impl std::fmt::Display for RowRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            RowRejection::EmptyVersion => "empty version",
            RowRejection::UnparsableVersion => "unparsable version",
            RowRejection::NonAsciiContent => "non-ASCII content",
            RowRejection::InvalidScore => "score outside 1..=5",
            RowRejection::Undecodable => "undecodable record",
        };
        f.write_str(reason)
    }
}
