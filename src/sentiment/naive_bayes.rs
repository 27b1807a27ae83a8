//! Multinomial Naive Bayes classifier
//!
//! Trains on a document-feature matrix with one label per row and produces
//! an immutable [`NaiveBayesModel`].

use crate::error::{Error, Result};
use crate::models::ScoredTerm;
use crate::nlp::dfm::rank_terms;
use crate::nlp::Dfm;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Naive Bayes trainer
#[derive(Debug, Clone)]
pub struct NaiveBayes {
    /// Additive (Laplace) smoothing
    alpha: f64,
    /// Canonical class order; inferred from labels when not set
    classes: Option<Vec<String>>,
}

impl NaiveBayes {
    pub fn new() -> Self {
        Self {
            alpha: 1.0,
            classes: None,
        }
    }

    /// Set the smoothing parameter
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Fix the class order. Ties at prediction time go to the earlier class,
    /// and every listed class must have training rows.
    pub fn with_classes<S: AsRef<str>>(mut self, classes: &[S]) -> Self {
        self.classes = Some(classes.iter().map(|c| c.as_ref().to_string()).collect());
        self
    }

    /// Train on `dfm` with `labels[i]` the class of row `i`
    pub fn train<S: AsRef<str>>(&self, dfm: &Dfm, labels: &[S]) -> Result<NaiveBayesModel> {
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(Error::Config(format!(
                "smoothing alpha must be positive, got {}",
                self.alpha
            )));
        }
        if labels.len() != dfm.n_rows() {
            return Err(Error::DimensionMismatch {
                expected: dfm.n_rows(),
                actual: labels.len(),
            });
        }
        dfm.require_vocabulary()?;

        let classes: Vec<String> = match &self.classes {
            Some(classes) => classes.clone(),
            None => labels
                .iter()
                .map(|l| l.as_ref().to_string())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        };
        if classes.len() < 2 {
            return Err(Error::InsufficientData(format!(
                "need at least two classes, got {}",
                classes.len()
            )));
        }

        let class_index: HashMap<&str, usize> = classes
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.as_str(), idx))
            .collect();

        let n_terms = dfm.n_terms();
        let mut class_rows = vec![0usize; classes.len()];
        let mut term_counts = vec![vec![0.0; n_terms]; classes.len()];

        for (row, label) in labels.iter().enumerate() {
            let label = label.as_ref();
            let class = *class_index.get(label).ok_or_else(|| {
                Error::InvalidInput(format!("label '{}' is not one of {:?}", label, classes))
            })?;

            class_rows[class] += 1;
            for (col, count) in dfm.row(row) {
                term_counts[class][col] += count;
            }
        }

        if let Some(empty) = class_rows.iter().position(|&n| n == 0) {
            return Err(Error::InsufficientData(format!(
                "class '{}' has no training rows",
                classes[empty]
            )));
        }

        let total_rows = labels.len() as f64;
        let priors: Vec<f64> = class_rows.iter().map(|&n| n as f64 / total_rows).collect();

        // P(term|class) = (count + alpha) / (total + alpha * |V|)
        let vocab_size = n_terms as f64;
        let log_likelihoods: Vec<Vec<f64>> = term_counts
            .iter()
            .map(|counts| {
                let total: f64 = counts.iter().sum();
                let denom = total + self.alpha * vocab_size;
                counts
                    .iter()
                    .map(|&count| ((count + self.alpha) / denom).ln())
                    .collect()
            })
            .collect();

        debug!(
            "Trained Naive Bayes on {} rows, {} terms, classes {:?} with {:?} rows",
            labels.len(),
            n_terms,
            classes,
            class_rows
        );

        let terms = dfm.terms().to_vec();
        Ok(NaiveBayesModel {
            vocabulary: index_terms(&terms),
            terms,
            classes,
            priors,
            log_likelihoods,
            alpha: self.alpha,
        })
    }
}

impl Default for NaiveBayes {
    fn default() -> Self {
        Self::new()
    }
}

/// Trained multinomial Naive Bayes model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaiveBayesModel {
    /// Class labels in canonical order
    classes: Vec<String>,
    /// P(class)
    priors: Vec<f64>,
    /// log P(term|class), `[class][term]`
    log_likelihoods: Vec<Vec<f64>>,
    /// Training vocabulary
    terms: Vec<String>,
    #[serde(skip)]
    vocabulary: HashMap<String, usize>,
    /// Smoothing used during training
    alpha: f64,
}

impl NaiveBayesModel {
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Prior of a class
    pub fn prior(&self, class: &str) -> Option<f64> {
        self.class_index(class).map(|c| self.priors[c])
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn vocab_size(&self) -> usize {
        self.terms.len()
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    fn class_index(&self, class: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == class)
    }

    fn term_index(&self, term: &str) -> Option<usize> {
        if self.vocabulary.is_empty() && !self.terms.is_empty() {
            // Deserialized model: vocabulary index is not stored
            return self.terms.iter().position(|t| t == term);
        }
        self.vocabulary.get(term).copied()
    }

    /// Rebuild the term index after deserialization
    pub fn reindexed(mut self) -> Self {
        self.vocabulary = index_terms(&self.terms);
        self
    }

    /// P(term|class)
    pub fn probability(&self, class: &str, term: &str) -> Option<f64> {
        let c = self.class_index(class)?;
        let t = self.term_index(term)?;
        Some(self.log_likelihoods[c][t].exp())
    }

    /// Joint log scores, `[row][class]`. Terms unknown to the model are ignored.
    pub fn log_scores(&self, dfm: &Dfm) -> Vec<Vec<f64>> {
        let column_map: Vec<Option<usize>> =
            dfm.terms().iter().map(|t| self.term_index(t)).collect();

        (0..dfm.n_rows())
            .map(|row| {
                (0..self.classes.len())
                    .map(|c| {
                        let mut score = self.priors[c].ln();
                        for (col, count) in dfm.row(row) {
                            if let Some(t) = column_map[col] {
                                score += count * self.log_likelihoods[c][t];
                            }
                        }
                        score
                    })
                    .collect()
            })
            .collect()
    }

    /// Most probable class of each row; ties go to the earlier class
    pub fn predict(&self, dfm: &Dfm) -> Vec<String> {
        self.log_scores(dfm)
            .into_iter()
            .map(|scores| {
                let mut best = 0;
                for (c, &score) in scores.iter().enumerate().skip(1) {
                    if score > scores[best] {
                        best = c;
                    }
                }
                self.classes[best].clone()
            })
            .collect()
    }

    /// Posterior class probabilities of each row, `[row][class]`
    pub fn predict_proba(&self, dfm: &Dfm) -> Vec<Vec<f64>> {
        self.log_scores(dfm)
            .into_iter()
            .map(|scores| {
                let max_score = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                let exp: Vec<f64> = scores.iter().map(|s| (s - max_score).exp()).collect();
                let sum: f64 = exp.iter().sum();
                exp.into_iter().map(|e| e / sum).collect()
            })
            .collect()
    }

    /// P(term|class) for every class and term
    pub fn conditional_probabilities(&self) -> Vec<(String, Vec<ScoredTerm>)> {
        self.classes
            .iter()
            .zip(self.log_likelihoods.iter())
            .map(|(class, logs)| {
                let probs = self
                    .terms
                    .iter()
                    .zip(logs.iter())
                    .map(|(term, &lp)| ScoredTerm {
                        term: term.clone(),
                        score: lp.exp(),
                    })
                    .collect();
                (class.clone(), probs)
            })
            .collect()
    }

    /// Terms with the highest P(term|class), ties broken by term
    pub fn top_terms(&self, class: &str, n: usize) -> Option<Vec<ScoredTerm>> {
        let c = self.class_index(class)?;
        Some(rank_terms(
            self.terms
                .iter()
                .zip(self.log_likelihoods[c].iter().map(|lp| lp.exp())),
            n,
        ))
    }
}

fn index_terms(terms: &[String]) -> HashMap<String, usize> {
    terms
        .iter()
        .enumerate()
        .map(|(idx, term)| (term.clone(), idx))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Document;
    use approx::assert_abs_diff_eq;

    fn docs(rows: &[&[&str]]) -> Vec<Document> {
        rows.iter()
            .map(|words| Document::new(words.iter().map(|w| w.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_separable_love_hate() {
        let dfm = Dfm::build(&docs(&[
            &["love", "app"],
            &["love"],
            &["really", "love", "it"],
            &["hate", "app"],
            &["hate"],
        ]));
        let labels = ["high", "high", "high", "low", "low"];

        let model = NaiveBayes::new()
            .with_classes(&["high", "low"])
            .train(&dfm, &labels)
            .unwrap();

        assert_eq!(model.predict(&dfm), labels);
    }

    #[test]
    fn test_priors_and_smoothing() {
        let dfm = Dfm::build(&docs(&[&["good", "good"], &["bad"], &["good"]]));
        let model = NaiveBayes::new().train(&dfm, &["pos", "neg", "pos"]).unwrap();

        assert_eq!(model.classes(), &["neg", "pos"]);
        assert_abs_diff_eq!(model.prior("pos").unwrap(), 2.0 / 3.0, epsilon = 1e-12);

        // pos: good=3, bad=0, total=3, |V|=2
        assert_abs_diff_eq!(model.probability("pos", "good").unwrap(), 4.0 / 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(model.probability("pos", "bad").unwrap(), 1.0 / 5.0, epsilon = 1e-12);
        // neg: good=0, bad=1, total=1
        assert_abs_diff_eq!(model.probability("neg", "bad").unwrap(), 2.0 / 3.0, epsilon = 1e-12);

        let proba = model.predict_proba(&dfm);
        for row in proba {
            assert_abs_diff_eq!(row.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_unknown_terms_ignored_and_ties() {
        let train = Dfm::build(&docs(&[&["love"], &["hate"]]));
        let model = NaiveBayes::new()
            .with_classes(&["low", "high"])
            .train(&train, &["high", "low"])
            .unwrap();

        // Only unseen terms and an empty row: equal priors, tie -> first class
        let test = Dfm::build(&docs(&[&["brand", "new"], &[]]));
        assert_eq!(model.predict(&test), vec!["low", "low"]);
    }

    #[test]
    fn test_training_errors() {
        let dfm = Dfm::build(&docs(&[&["love"], &["hate"]]));

        let err = NaiveBayes::new().train(&dfm, &["high"]).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { .. }));

        let err = NaiveBayes::new().train(&dfm, &["high", "high"]).unwrap_err();
        assert!(matches!(err, Error::InsufficientData(_)));

        let err = NaiveBayes::new()
            .with_classes(&["high", "low"])
            .train(&dfm, &["high", "high"])
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientData(_)));

        let err = NaiveBayes::new()
            .with_classes(&["high", "low"])
            .train(&dfm, &["high", "meh"])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = NaiveBayes::new()
            .with_alpha(0.0)
            .train(&dfm, &["high", "low"])
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let empty = Dfm::build(&docs(&[&[], &[]]));
        let err = NaiveBayes::new().train(&empty, &["high", "low"]).unwrap_err();
        assert!(matches!(err, Error::EmptyVocabulary));
    }

    #[test]
    fn test_top_terms() {
        let dfm = Dfm::build(&docs(&[
            &["love", "love", "match"],
            &["crash", "bug"],
            &["love"],
        ]));
        let model = NaiveBayes::new().train(&dfm, &["high", "low", "high"]).unwrap();

        let top = model.top_terms("high", 2).unwrap();
        assert_eq!(top[0].term, "love");
        assert_eq!(top[1].term, "match");

        // bug and crash tie in "low"; lexical order breaks it
        let low = model.top_terms("low", 2).unwrap();
        assert_eq!(low[0].term, "bug");
        assert_eq!(low[1].term, "crash");

        assert!(model.top_terms("unknown", 2).is_none());
        assert_eq!(model.conditional_probabilities().len(), 2);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let dfm = Dfm::build(&docs(&[&["love"], &["hate"]]));
        let model = NaiveBayes::new().train(&dfm, &["high", "low"]).unwrap();

        let json = serde_json::to_string(&model).unwrap();
        let restored: NaiveBayesModel = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.predict(&dfm), model.predict(&dfm));
        let restored = restored.reindexed();
        assert_eq!(restored.classes(), model.classes());
        assert_eq!(restored.terms(), model.terms());
        assert_eq!(restored.predict(&dfm), vec!["high", "low"]);
    }
}
