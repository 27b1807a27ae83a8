//! Emotion lexicons
//!
//! A lexicon maps terms to one or more categories (emotions or polarity).
//! The file layout is the word-level NRC one: `term<TAB>category<TAB>flag`,
//! where only entries with flag `1` are kept.

use crate::error::{Error, Result};
use crate::nlp::TokenStemmer;
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// The eight NRC emotions
pub const NRC_EMOTIONS: [&str; 8] = [
    "anger",
    "anticipation",
    "disgust",
    "fear",
    "joy",
    "sadness",
    "surprise",
    "trust",
];

/// Term -> category lookup
pub trait CategoryLexicon {
    /// Categories a term belongs to
    fn categories_of(&self, term: &str) -> Option<&BTreeSet<String>>;

    /// All categories present in the lexicon
    fn categories(&self) -> BTreeSet<&str>;

    fn contains(&self, term: &str) -> bool {
        self.categories_of(term).is_some()
    }
}

/// Immutable term -> categories mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmotionLexicon {
    entries: HashMap<String, BTreeSet<String>>,
}

impl EmotionLexicon {
    /// Build from (term, category) pairs
    pub fn from_pairs<I, T, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, C)>,
        T: AsRef<str>,
        C: AsRef<str>,
    {
        let mut entries: HashMap<String, BTreeSet<String>> = HashMap::new();
        for (term, category) in pairs {
            entries
                .entry(term.as_ref().trim().to_lowercase())
                .or_default()
                .insert(category.as_ref().trim().to_lowercase());
        }
        Self { entries }
    }

    /// Load a lexicon file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)?;
        let lexicon = Self::from_reader(BufReader::new(file))?;
        debug!(
            "Loaded lexicon from {:?}: {} terms",
            path.as_ref(),
            lexicon.len()
        );
        Ok(lexicon)
    }

    /// Parse tab-separated `term, category[, flag]` lines.
    ///
    /// Blank lines and lines starting with `#` are skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut pairs = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = trimmed.split('\t').map(|f| f.trim()).collect();
            let member = match fields.as_slice() {
                [_, _] => true,
                [_, _, "1"] => true,
                [_, _, "0"] => false,
                _ => {
                    return Err(Error::InvalidInput(format!(
                        "lexicon line {}: expected 'term<TAB>category[<TAB>0|1]', got '{}'",
                        idx + 1,
                        trimmed
                    )))
                }
            };

            if member && !fields[0].is_empty() && !fields[1].is_empty() {
                pairs.push((fields[0].to_string(), fields[1].to_string()));
            }
        }

        Ok(Self::from_pairs(pairs))
    }

    /// Lexicon whose terms went through `stemmer`, so it lines up with a
    /// stemmed document-feature matrix. Terms sharing a stem merge categories.
    pub fn stemmed(&self, stemmer: &dyn TokenStemmer) -> Self {
        let mut entries: HashMap<String, BTreeSet<String>> = HashMap::new();
        for (term, categories) in &self.entries {
            entries
                .entry(stemmer.stem(term))
                .or_default()
                .extend(categories.iter().cloned());
        }
        Self { entries }
    }

    /// Number of terms
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CategoryLexicon for EmotionLexicon {
    fn categories_of(&self, term: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(term)
    }

    fn categories(&self) -> BTreeSet<&str> {
        self.entries
            .values()
            .flat_map(|cats| cats.iter().map(|c| c.as_str()))
            .collect()
    }
}
