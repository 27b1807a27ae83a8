//! Text tokenizer
//!
//! Lowercases text and splits it into word tokens. Punctuation and symbol
//! characters either separate words and are dropped, or are kept as
//! single-character tokens.

use regex::Regex;
use std::sync::LazyLock;

/// Digit runs
static NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());
/// Handle and hashtag markers
static MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[@#]").unwrap());

/// ASCII characters in the Unicode symbol classes (currency, math, modifiers)
const ASCII_SYMBOLS: &[char] = &['$', '+', '<', '=', '>', '^', '`', '|', '~'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Word,
    Apostrophe,
    Space,
    Punctuation,
    Symbol,
}

fn classify(c: char) -> CharClass {
    if c.is_alphanumeric() || c == '_' {
        CharClass::Word
    } else if c == '\'' || c == '\u{2019}' {
        CharClass::Apostrophe
    } else if c.is_whitespace() {
        CharClass::Space
    } else if c.is_ascii_punctuation() {
        if ASCII_SYMBOLS.contains(&c) {
            CharClass::Symbol
        } else {
            CharClass::Punctuation
        }
    } else if matches!(c, '\u{2010}'..='\u{2027}' | '\u{2030}'..='\u{205E}' | '¡' | '¿' | '«' | '»')
    {
        CharClass::Punctuation
    } else {
        CharClass::Symbol
    }
}

/// Text tokenizer
#[derive(Debug, Clone)]
pub struct Tokenizer {
    /// Drop punctuation instead of emitting it as tokens
    remove_punctuation: bool,
    /// Drop symbols instead of emitting them as tokens
    remove_symbols: bool,
    /// Strip digit runs from tokens
    remove_numbers: bool,
}

impl Tokenizer {
    /// Create a tokenizer that removes punctuation, symbols and numbers
    pub fn new() -> Self {
        Self {
            remove_punctuation: true,
            remove_symbols: true,
            remove_numbers: true,
        }
    }

    pub fn remove_punctuation(mut self, remove: bool) -> Self {
        self.remove_punctuation = remove;
        self
    }

    pub fn remove_symbols(mut self, remove: bool) -> Self {
        self.remove_symbols = remove;
        self
    }

    pub fn remove_numbers(mut self, remove: bool) -> Self {
        self.remove_numbers = remove;
        self
    }

    /// Tokenize text into lowercase tokens, in text order
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let mut raw_tokens = Vec::new();
        let mut word = String::new();
        let mut chars = lowered.chars().peekable();

        while let Some(c) = chars.next() {
            match classify(c) {
                CharClass::Word => word.push(c),
                CharClass::Apostrophe => {
                    // Intra-word apostrophe ("don't") stays part of the word
                    let next_is_word = chars
                        .peek()
                        .map(|&n| classify(n) == CharClass::Word)
                        .unwrap_or(false);
                    if !word.is_empty() && next_is_word {
                        word.push('\'');
                    } else {
                        flush(&mut word, &mut raw_tokens);
                        if !self.remove_punctuation {
                            raw_tokens.push(c.to_string());
                        }
                    }
                }
                CharClass::Space => flush(&mut word, &mut raw_tokens),
                CharClass::Punctuation => {
                    flush(&mut word, &mut raw_tokens);
                    if !self.remove_punctuation {
                        raw_tokens.push(c.to_string());
                    }
                }
                CharClass::Symbol => {
                    flush(&mut word, &mut raw_tokens);
                    if !self.remove_symbols {
                        raw_tokens.push(c.to_string());
                    }
                }
            }
        }
        flush(&mut word, &mut raw_tokens);

        raw_tokens
            .into_iter()
            .map(|token| self.strip(token))
            .filter(|token| !token.is_empty())
            .collect()
    }

    fn strip(&self, token: String) -> String {
        let token = if self.remove_numbers {
            NUMBER_REGEX.replace_all(&token, "").into_owned()
        } else {
            token
        };
        MARKER_REGEX.replace_all(&token, "").into_owned()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

fn flush(word: &mut String, tokens: &mut Vec<String>) {
    if !word.is_empty() {
        tokens.push(std::mem::take(word));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_tokenization() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("Hello, World!");

        assert_eq!(tokens, vec!["hello", "world"]);
    }

    #[test]
    fn test_apostrophes() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("I don't like 'quoted' words");

        assert_eq!(tokens, vec!["i", "don't", "like", "quoted", "words"]);
    }

    #[test]
    fn test_numbers_removed() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("Version 13 is 2x better");

        assert_eq!(tokens, vec!["version", "is", "x", "better"]);
    }

    #[test]
    fn test_numbers_kept() {
        let tokenizer = Tokenizer::new().remove_numbers(false);
        let tokens = tokenizer.tokenize("5 stars");

        assert_eq!(tokens, vec!["5", "stars"]);
    }

    #[test]
    fn test_keep_punctuation_and_symbols() {
        let tokenizer = Tokenizer::new()
            .remove_punctuation(false)
            .remove_symbols(false);
        let tokens = tokenizer.tokenize("great!! $5");

        assert_eq!(tokens, vec!["great", "!", "!", "$"]);
    }

    #[test]
    fn test_markers_always_stripped() {
        let tokenizer = Tokenizer::new().remove_punctuation(false);
        let tokens = tokenizer.tokenize("@support #fail");

        assert_eq!(tokens, vec!["support", "fail"]);
    }

    #[test]
    fn test_empty_text() {
        let tokenizer = Tokenizer::new();
        assert!(tokenizer.tokenize("").is_empty());
        assert!(tokenizer.tokenize("  ...  ").is_empty());
    }
}
