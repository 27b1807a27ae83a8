//! Lexicon scoring and Naive Bayes rating classification

pub mod lexicon;
pub mod naive_bayes;
pub mod scorer;

pub use lexicon::{CategoryLexicon, EmotionLexicon, NRC_EMOTIONS};
pub use naive_bayes::{NaiveBayes, NaiveBayesModel};
pub use scorer::{CategoryScoreTable, LexiconScorer};
