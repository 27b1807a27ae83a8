//! Lexicon scoring of weighted document-feature matrices

use crate::nlp::Dfm;
use crate::sentiment::lexicon::CategoryLexicon;
use serde::{Deserialize, Serialize};

/// Per-row, per-category scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScoreTable {
    /// Row labels (e.g. app versions)
    pub rows: Vec<String>,
    /// Requested categories, in request order
    pub categories: Vec<String>,
    /// `values[row][category]`
    pub values: Vec<Vec<f64>>,
}

impl CategoryScoreTable {
    /// Score of one (row, category) cell
    pub fn get(&self, row: &str, category: &str) -> Option<f64> {
        let r = self.rows.iter().position(|name| name == row)?;
        let c = self.categories.iter().position(|name| name == category)?;
        Some(self.values[r][c])
    }

    /// All scores of one category, in row order
    pub fn column(&self, category: &str) -> Option<Vec<f64>> {
        let c = self.categories.iter().position(|name| name == category)?;
        Some(self.values.iter().map(|row| row[c]).collect())
    }
}

impl std::fmt::Display for CategoryScoreTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>10}", "")?;
        for category in &self.categories {
            write!(f, " {:>12}", category)?;
        }
        writeln!(f)?;

        for (name, values) in self.rows.iter().zip(self.values.iter()) {
            write!(f, "{:>10}", name)?;
            for value in values {
                write!(f, " {:>12.4}", value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Sums DFM cells by lexicon category
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    categories: Vec<String>,
}

impl LexiconScorer {
    /// Score only these categories
    pub fn new<S: AsRef<str>>(categories: &[S]) -> Self {
        Self {
            categories: categories
                .iter()
                .map(|c| c.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// For every row and requested category, sum the row's values over
    /// terms that the lexicon maps to the category
    pub fn score<L>(&self, dfm: &Dfm, lexicon: &L) -> CategoryScoreTable
    where
        L: CategoryLexicon + ?Sized,
    {
        // Requested-category indices of every DFM column
        let column_categories: Vec<Vec<usize>> = dfm
            .terms()
            .iter()
            .map(|term| match lexicon.categories_of(term) {
                Some(cats) => self
                    .categories
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| cats.contains(c.as_str()))
                    .map(|(idx, _)| idx)
                    .collect(),
                None => Vec::new(),
            })
            .collect();

        let values = (0..dfm.n_rows())
            .map(|row| {
                let mut scores = vec![0.0; self.categories.len()];
                for (col, value) in dfm.row(row) {
                    for &cat in &column_categories[col] {
                        scores[cat] += value;
                    }
                }
                scores
            })
            .collect();

        CategoryScoreTable {
            rows: dfm.row_names().to_vec(),
            categories: self.categories.clone(),
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Document;
    use crate::nlp::Weighting;
    use crate::sentiment::EmotionLexicon;
    use approx::assert_abs_diff_eq;

    fn doc(words: &[&str]) -> Document {
        Document::new(words.iter().map(|w| w.to_string()).collect())
    }

    fn lexicon() -> EmotionLexicon {
        EmotionLexicon::from_pairs([
            ("love", "joy"),
            ("love", "trust"),
            ("hate", "anger"),
            ("crash", "fear"),
            ("crash", "anger"),
        ])
    }

    #[test]
    fn test_score_grouped_proportions() {
        let dfm = Dfm::build(&[
            doc(&["love", "app"]),
            doc(&["hate", "crash", "app", "app"]),
            doc(&[]),
        ])
        .group(&[1u32, 2, 3])
        .unwrap()
        .weight(Weighting::Proportion);

        let table = LexiconScorer::new(&["joy", "anger", "fear"]).score(&dfm, &lexicon());

        assert_eq!(table.rows, vec!["1", "2", "3"]);
        assert_eq!(table.categories, vec!["joy", "anger", "fear"]);
        assert_abs_diff_eq!(table.get("1", "joy").unwrap(), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(table.get("2", "anger").unwrap(), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(table.get("2", "fear").unwrap(), 0.25, epsilon = 1e-12);
        assert_eq!(table.get("3", "joy"), Some(0.0));

        for row in &table.values {
            for &value in row {
                assert!((0.0..=1.0).contains(&value));
            }
        }
    }

    #[test]
    fn test_only_requested_categories() {
        let dfm = Dfm::build(&[doc(&["love"])]);
        let table = LexiconScorer::new(&["trust", "surprise"]).score(&dfm, &lexicon());

        assert_eq!(table.categories, vec!["trust", "surprise"]);
        assert_eq!(table.get("doc_0", "trust"), Some(1.0));
        assert_eq!(table.get("doc_0", "surprise"), Some(0.0));
        assert_eq!(table.get("doc_0", "joy"), None);
        assert_eq!(table.column("trust"), Some(vec![1.0]));
    }
}
