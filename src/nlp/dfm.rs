//! Sparse document-feature matrix (DFM)
//!
//! Rows are documents (or groups of documents), columns are vocabulary
//! terms. Only nonzero cells are stored. Every operation returns a new
//! matrix and leaves its input untouched.

use crate::error::{Error, Result};
use crate::models::{Document, ScoredTerm};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Display;

/// Term-frequency variant used by TF-IDF weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermFrequency {
    /// Raw count
    Count,
    /// Count divided by row total
    Proportion,
    /// 1 + log(count)
    LogCount,
    /// 1 if present
    Boolean,
}

/// Cell weighting scheme
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Weighting {
    /// Each row divided by its total
    Proportion,
    /// Term frequency times log(N / document frequency)
    TfIdf { tf: TermFrequency, base: f64 },
}

impl Weighting {
    /// TF-IDF with raw counts and base-10 logarithm
    pub fn tfidf() -> Self {
        Weighting::TfIdf {
            tf: TermFrequency::Count,
            base: 10.0,
        }
    }
}

/// Sparse document-feature matrix
#[derive(Debug, Clone, PartialEq)]
pub struct Dfm {
    /// Row labels (document ids or group keys)
    row_names: Vec<String>,
    /// Column index -> term
    terms: Vec<String>,
    /// Term -> column index
    vocabulary: HashMap<String, usize>,
    /// Nonzero cells per row: column -> value
    rows: Vec<BTreeMap<usize, f64>>,
}

impl Dfm {
    /// Count tokens per document. Rows are named `doc_0`, `doc_1`, ...
    pub fn build(documents: &[Document]) -> Self {
        let distinct: BTreeSet<&str> = documents
            .iter()
            .flat_map(|doc| doc.iter().map(|t| t.as_str()))
            .collect();

        let terms: Vec<String> = distinct.into_iter().map(|t| t.to_string()).collect();
        let vocabulary = index_terms(&terms);

        let rows = documents
            .iter()
            .map(|doc| {
                let mut row = BTreeMap::new();
                for token in doc {
                    if let Some(&col) = vocabulary.get(token) {
                        *row.entry(col).or_insert(0.0) += 1.0;
                    }
                }
                row
            })
            .collect();

        let row_names = (0..documents.len()).map(|i| format!("doc_{}", i)).collect();

        Self {
            row_names,
            terms,
            vocabulary,
            rows,
        }
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn row_names(&self) -> &[String] {
        &self.row_names
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Column index of a term
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Cell value; zero for absent rows, terms or cells
    pub fn get(&self, row: usize, term: &str) -> f64 {
        match (self.rows.get(row), self.term_index(term)) {
            (Some(cells), Some(col)) => cells.get(&col).copied().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Nonzero cells of a row as (column, value)
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.rows
            .get(row)
            .into_iter()
            .flat_map(|cells| cells.iter().map(|(&col, &value)| (col, value)))
    }

    /// Fail with [`Error::EmptyVocabulary`] when there are no columns
    pub fn require_vocabulary(&self) -> Result<()> {
        if self.terms.is_empty() {
            Err(Error::EmptyVocabulary)
        } else {
            Ok(())
        }
    }

    /// Sum of each row
    pub fn row_totals(&self) -> Vec<f64> {
        self.rows.iter().map(|cells| cells.values().sum()).collect()
    }

    /// Sum of each column
    pub fn column_totals(&self) -> Vec<f64> {
        let mut totals = vec![0.0; self.terms.len()];
        for cells in &self.rows {
            for (&col, &value) in cells {
                totals[col] += value;
            }
        }
        totals
    }

    /// Number of rows with a nonzero value, per column
    pub fn document_frequencies(&self) -> Vec<usize> {
        let mut freqs = vec![0usize; self.terms.len()];
        for cells in &self.rows {
            for (&col, &value) in cells {
                if value != 0.0 {
                    freqs[col] += 1;
                }
            }
        }
        freqs
    }

    /// Drop columns whose total is below `min_termfreq` or that are nonzero
    /// in fewer than `min_docfreq` rows
    pub fn trim(&self, min_termfreq: usize, min_docfreq: usize) -> Dfm {
        let totals = self.column_totals();
        let doc_freqs = self.document_frequencies();

        let keep: Vec<bool> = totals
            .iter()
            .zip(doc_freqs.iter())
            .map(|(&total, &df)| total >= min_termfreq as f64 && df >= min_docfreq)
            .collect();

        self.keep_columns(&keep)
    }

    fn keep_columns(&self, keep: &[bool]) -> Dfm {
        let mut remap = vec![None; self.terms.len()];
        let mut terms = Vec::new();
        for (col, term) in self.terms.iter().enumerate() {
            if keep[col] {
                remap[col] = Some(terms.len());
                terms.push(term.clone());
            }
        }

        let rows = self
            .rows
            .iter()
            .map(|cells| {
                cells
                    .iter()
                    .filter_map(|(&col, &value)| remap[col].map(|new_col| (new_col, value)))
                    .collect()
            })
            .collect();

        Dfm {
            row_names: self.row_names.clone(),
            vocabulary: index_terms(&terms),
            terms,
            rows,
        }
    }

    /// Sum rows that share a key. Output rows are ordered by key.
    pub fn group<K>(&self, keys: &[K]) -> Result<Dfm>
    where
        K: Ord + Clone + Display,
    {
        if keys.len() != self.rows.len() {
            return Err(Error::DimensionMismatch {
                expected: self.rows.len(),
                actual: keys.len(),
            });
        }

        let mut groups: BTreeMap<K, BTreeMap<usize, f64>> = BTreeMap::new();
        for (key, cells) in keys.iter().zip(self.rows.iter()) {
            let group = groups.entry(key.clone()).or_default();
            for (&col, &value) in cells {
                *group.entry(col).or_insert(0.0) += value;
            }
        }

        let mut row_names = Vec::with_capacity(groups.len());
        let mut rows = Vec::with_capacity(groups.len());
        for (key, cells) in groups {
            row_names.push(key.to_string());
            rows.push(cells);
        }

        Ok(Dfm {
            row_names,
            terms: self.terms.clone(),
            vocabulary: self.vocabulary.clone(),
            rows,
        })
    }

    /// Reweight cells
    pub fn weight(&self, weighting: Weighting) -> Dfm {
        let rows = match weighting {
            Weighting::Proportion => self
                .rows
                .iter()
                .map(|cells| {
                    let total: f64 = cells.values().sum();
                    if total == 0.0 {
                        BTreeMap::new()
                    } else {
                        cells.iter().map(|(&col, &v)| (col, v / total)).collect()
                    }
                })
                .collect(),
            Weighting::TfIdf { tf, base } => {
                let n = self.rows.len() as f64;
                let idf: Vec<f64> = self
                    .document_frequencies()
                    .into_iter()
                    .map(|df| {
                        if df == 0 {
                            0.0
                        } else {
                            (n / df as f64).log(base)
                        }
                    })
                    .collect();

                self.rows
                    .iter()
                    .map(|cells| {
                        let total: f64 = cells.values().sum();
                        cells
                            .iter()
                            .map(|(&col, &v)| (col, term_frequency(tf, v, total, base) * idf[col]))
                            .filter(|&(_, w)| w != 0.0)
                            .collect()
                    })
                    .collect()
            }
        };

        Dfm {
            row_names: self.row_names.clone(),
            terms: self.terms.clone(),
            vocabulary: self.vocabulary.clone(),
            rows,
        }
    }

    /// Subset of rows, in the given order; columns unchanged
    pub fn select_rows(&self, indices: &[usize]) -> Result<Dfm> {
        let mut row_names = Vec::with_capacity(indices.len());
        let mut rows = Vec::with_capacity(indices.len());

        for &idx in indices {
            let cells = self.rows.get(idx).ok_or_else(|| {
                Error::InvalidInput(format!("row {} out of range ({} rows)", idx, self.rows.len()))
            })?;
            row_names.push(self.row_names[idx].clone());
            rows.push(cells.clone());
        }

        Ok(Dfm {
            row_names,
            terms: self.terms.clone(),
            vocabulary: self.vocabulary.clone(),
            rows,
        })
    }

    /// Project onto a fixed vocabulary: columns become `terms` (in order),
    /// values of other terms are dropped
    pub fn match_terms(&self, terms: &[String]) -> Dfm {
        let vocabulary = index_terms(terms);
        let remap: Vec<Option<usize>> = self
            .terms
            .iter()
            .map(|t| vocabulary.get(t).copied())
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|cells| {
                cells
                    .iter()
                    .filter_map(|(&col, &value)| remap[col].map(|new_col| (new_col, value)))
                    .collect()
            })
            .collect();

        Dfm {
            row_names: self.row_names.clone(),
            terms: terms.to_vec(),
            vocabulary,
            rows,
        }
    }

    /// Terms with the largest column totals, ties broken by term
    pub fn top_features(&self, n: usize) -> Vec<ScoredTerm> {
        let totals = self.column_totals();
        rank_terms(
            self.terms.iter().zip(totals).filter(|(_, v)| *v != 0.0),
            n,
        )
    }

    /// Largest cells of every row, ties broken by term
    pub fn top_features_by_row(&self, n: usize) -> Vec<(String, Vec<ScoredTerm>)> {
        self.row_names
            .iter()
            .zip(self.rows.iter())
            .map(|(name, cells)| {
                let ranked = rank_terms(
                    cells.iter().map(|(&col, &v)| (&self.terms[col], v)),
                    n,
                );
                (name.clone(), ranked)
            })
            .collect()
    }
}

fn index_terms(terms: &[String]) -> HashMap<String, usize> {
    terms
        .iter()
        .enumerate()
        .map(|(idx, term)| (term.clone(), idx))
        .collect()
}

fn term_frequency(tf: TermFrequency, count: f64, row_total: f64, base: f64) -> f64 {
    match tf {
        TermFrequency::Count => count,
        TermFrequency::Proportion if row_total == 0.0 => 0.0,
        TermFrequency::Proportion => count / row_total,
        TermFrequency::LogCount if count > 0.0 => 1.0 + count.log(base),
        TermFrequency::LogCount => 0.0,
        TermFrequency::Boolean if count != 0.0 => 1.0,
        TermFrequency::Boolean => 0.0,
    }
}

/// Sort (term, score) descending by score, then ascending by term, and keep `n`
pub(crate) fn rank_terms<'a, I>(scored: I, n: usize) -> Vec<ScoredTerm>
where
    I: IntoIterator<Item = (&'a String, f64)>,
{
    let mut ranked: Vec<ScoredTerm> = scored
        .into_iter()
        .map(|(term, score)| ScoredTerm {
            term: term.clone(),
            score,
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.term.cmp(&b.term)));
    ranked.truncate(n);
    ranked
}
