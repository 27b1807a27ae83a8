//! Evaluation of predicted labels

pub mod metrics;

pub use metrics::{majority_baseline, ConfusionMatrix, PrecisionRecall};
