//! Data models

mod types;

pub use types::{Document, RatingClass, Review, ScoredTerm};
