//! Text normalization and document-feature matrices
//!
//! - `tokenizer` - splitting raw review text into lowercase tokens
//! - `stopwords` - stopword lists with prefix wildcards
//! - `stemmer` - Snowball stemming behind a small trait
//! - `preprocessor` - the full normalization chain, including n-grams
//! - `dfm` - sparse document-feature matrices, grouping and weighting

pub mod dfm;
pub mod preprocessor;
pub mod stemmer;
pub mod stopwords;
pub mod tokenizer;

pub use dfm::{Dfm, TermFrequency, Weighting};
pub use preprocessor::{ngrams, Preprocessor};
pub use stemmer::{IdentityStemmer, SnowballStemmer, TokenStemmer};
pub use stopwords::StopwordSet;
pub use tokenizer::Tokenizer;
