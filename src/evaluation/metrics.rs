//! Classification metrics
//!
//! Metrics with a zero denominator are reported as NaN rather than failing:
//! small held-out sets routinely produce them.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Confusion matrix, `counts[predicted][actual]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    labels: Vec<String>,
    counts: Vec<Vec<usize>>,
}

/// Precision, recall and F1 for one label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrecisionRecall {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl ConfusionMatrix {
    /// Tabulate predicted against actual labels
    pub fn new<P, A, L>(predicted: &[P], actual: &[A], label_order: &[L]) -> Result<Self>
    where
        P: AsRef<str>,
        A: AsRef<str>,
        L: AsRef<str>,
    {
        if predicted.len() != actual.len() {
            return Err(Error::DimensionMismatch {
                expected: actual.len(),
                actual: predicted.len(),
            });
        }

        let labels: Vec<String> = label_order.iter().map(|l| l.as_ref().to_string()).collect();
        let index: HashMap<&str, usize> = labels
            .iter()
            .enumerate()
            .map(|(idx, l)| (l.as_str(), idx))
            .collect();
        let lookup = |label: &str| {
            index
                .get(label)
                .copied()
                .ok_or_else(|| Error::InvalidInput(format!("unknown label '{}'", label)))
        };

        let mut counts = vec![vec![0usize; labels.len()]; labels.len()];
        for (p, a) in predicted.iter().zip(actual.iter()) {
            let p = lookup(p.as_ref())?;
            let a = lookup(a.as_ref())?;
            counts[p][a] += 1;
        }

        Ok(Self { labels, counts })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of rows predicted as `predicted` whose true label is `actual`
    pub fn count(&self, predicted: &str, actual: &str) -> Option<usize> {
        let p = self.position(predicted)?;
        let a = self.position(actual)?;
        Some(self.counts[p][a])
    }

    fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Total number of tabulated rows
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Correctly classified rows
    pub fn trace(&self) -> usize {
        (0..self.labels.len()).map(|i| self.counts[i][i]).sum()
    }

    /// Off-diagonal rows
    pub fn errors(&self) -> usize {
        self.total() - self.trace()
    }

    /// trace / total; NaN when empty
    pub fn accuracy(&self) -> f64 {
        ratio(self.trace(), self.total())
    }

    /// Precision and recall with `positive` as the positive label
    pub fn precision_recall(&self, positive: &str) -> Result<PrecisionRecall> {
        let p = self
            .position(positive)
            .ok_or_else(|| Error::InvalidInput(format!("unknown label '{}'", positive)))?;

        let tp = self.counts[p][p];
        let predicted_positive: usize = self.counts[p].iter().sum();
        let actual_positive: usize = self.counts.iter().map(|row| row[p]).sum();

        let precision = ratio(tp, predicted_positive);
        let recall = ratio(tp, actual_positive);
        let f1 = if precision.is_nan() || recall.is_nan() {
            f64::NAN
        } else if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };

        Ok(PrecisionRecall {
            precision,
            recall,
            f1,
        })
    }
}

impl std::fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:>12} | actual", "predicted")?;
        write!(f, "{:>12} |", "")?;
        for label in &self.labels {
            write!(f, " {:>8}", label)?;
        }
        writeln!(f)?;

        for (label, row) in self.labels.iter().zip(self.counts.iter()) {
            write!(f, "{:>12} |", label)?;
            for count in row {
                write!(f, " {:>8}", count)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Accuracy of always predicting the most frequent actual label
pub fn majority_baseline<S: AsRef<str>>(actual: &[S]) -> f64 {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in actual {
        *counts.entry(label.as_ref()).or_insert(0) += 1;
    }
    let majority = counts.values().copied().max().unwrap_or(0);
    ratio(majority, actual.len())
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        f64::NAN
    } else {
        numerator as f64 / denominator as f64
    }
}
