//! # Review text mining
//!
//! Text mining of app-store reviews: loading, normalization, document-feature
//! matrices, emotion lexicon scoring and Naive Bayes rating prediction.
//!
//! ## Modules
//!
//! - `data` - Loading and validating review tables
//! - `nlp` - Tokenization, stopwords, stemming, n-grams and DFMs
//! - `sentiment` - Lexicon scoring and the Naive Bayes classifier
//! - `evaluation` - Confusion matrices and classification metrics
//! - `pipeline` - The stages wired together
//! - `models` - Shared data types

pub mod config;
pub mod data;
pub mod error;
pub mod evaluation;
pub mod models;
pub mod nlp;
pub mod pipeline;
pub mod sentiment;

pub use config::{NormalizerConfig, PipelineConfig};
pub use data::{LoadReport, ReviewLoader};
pub use error::{Error, Result};
pub use evaluation::ConfusionMatrix;
pub use models::{Document, RatingClass, Review};
pub use nlp::{Dfm, Preprocessor, Tokenizer};
pub use pipeline::Pipeline;
pub use sentiment::{EmotionLexicon, LexiconScorer, NaiveBayes};
