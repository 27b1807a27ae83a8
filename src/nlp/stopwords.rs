//! Stopword sets
//!
//! Entries are either exact words (`"the"`) or prefix wildcards
//! (`"tinder*"` removes `tinder`, `tinders`, `tinderella`...).
//! Matching is case-insensitive.

use crate::error::{Error, Result};
use std::collections::HashSet;

/// Set of stopwords and prefix-wildcard patterns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopwordSet {
    exact: HashSet<String>,
    prefixes: Vec<String>,
}

impl StopwordSet {
    /// Empty set (removes nothing)
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in English stopword list
    pub fn english() -> Self {
        Self {
            exact: ENGLISH_STOPWORDS.iter().map(|s| s.to_string()).collect(),
            prefixes: Vec::new(),
        }
    }

    /// Add exact words or `prefix*` patterns
    pub fn with_patterns<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        for pattern in patterns {
            self.add_pattern(pattern.as_ref())?;
        }
        Ok(self)
    }

    /// Add one exact word or `prefix*` pattern.
    ///
    /// Only a single trailing `*` is supported.
    pub fn add_pattern(&mut self, pattern: &str) -> Result<()> {
        let pattern = pattern.trim().to_lowercase();

        match pattern.find('*') {
            None if pattern.is_empty() => Err(Error::Config("empty stopword pattern".into())),
            None => {
                self.exact.insert(pattern);
                Ok(())
            }
            Some(idx) if idx + 1 == pattern.len() && idx > 0 => {
                let prefix = pattern[..idx].to_string();
                if !self.prefixes.contains(&prefix) {
                    self.prefixes.push(prefix);
                }
                Ok(())
            }
            Some(_) => Err(Error::Config(format!(
                "unsupported stopword pattern '{}': only a trailing '*' is allowed",
                pattern
            ))),
        }
    }

    /// Check whether a token should be removed
    pub fn is_stopword(&self, token: &str) -> bool {
        if token.chars().any(|c| c.is_uppercase()) {
            let lower = token.to_lowercase();
            return self.matches(&lower);
        }
        self.matches(token)
    }

    fn matches(&self, token: &str) -> bool {
        self.exact.contains(token) || self.prefixes.iter().any(|p| token.starts_with(p.as_str()))
    }

    /// Number of exact words plus patterns
    pub fn len(&self) -> usize {
        self.exact.len() + self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Default English stop words
const ENGLISH_STOPWORDS: &[&str] = &[
    // Articles
    "a", "an", "the",
    // Pronouns
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those",
    // Verbs
    "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "having",
    "do", "does", "did", "doing", "would", "should", "could", "ought", "will", "shall",
    // Contractions
    "i'm", "you're", "he's", "she's", "it's", "we're", "they're", "i've", "you've", "we've",
    "they've", "i'd", "you'd", "he'd", "she'd", "we'd", "they'd", "i'll", "you'll", "he'll",
    "she'll", "we'll", "they'll", "isn't", "aren't", "wasn't", "weren't", "hasn't", "haven't",
    "hadn't", "doesn't", "don't", "didn't", "won't", "wouldn't", "shan't", "shouldn't",
    "can't", "cannot", "couldn't", "mustn't", "let's", "that's", "who's", "what's", "here's",
    "there's", "when's", "where's", "why's", "how's",
    // Prepositions
    "at", "by", "for", "from", "in", "into", "of", "on", "to", "with", "about", "against",
    "between", "through", "during", "before", "after", "above", "below", "up", "down", "out",
    "off", "over", "under", "again", "further", "then", "once",
    // Conjunctions
    "and", "but", "or", "nor", "so", "both", "not", "only", "than", "when", "where", "while",
    "if", "because", "as", "until",
    // Other common words
    "here", "there", "all", "each", "few", "more", "most", "other", "some", "such", "no",
    "any", "own", "same", "too", "very", "how", "why",
];
