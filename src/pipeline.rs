//! End-to-end review analysis
//!
//! Reviews -> documents -> document-feature matrix, then either grouped
//! term tables, lexicon scores by version, or a Naive Bayes rating model
//! with its evaluation.

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::evaluation::{majority_baseline, ConfusionMatrix, PrecisionRecall};
use crate::models::{Document, RatingClass, Review, ScoredTerm};
use crate::nlp::{Dfm, Preprocessor, Weighting};
use crate::sentiment::{CategoryScoreTable, EmotionLexicon, LexiconScorer, NaiveBayes};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Top terms of one group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTerms {
    pub group: String,
    pub terms: Vec<ScoredTerm>,
}

/// Outcome of training and evaluating the rating classifier
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationReport {
    pub train_size: usize,
    pub test_size: usize,
    pub vocab_size: usize,
    pub confusion: ConfusionMatrix,
    pub accuracy: f64,
    /// Accuracy of always predicting the most frequent test label
    pub baseline_accuracy: f64,
    /// Metrics with "high" as the positive label
    pub high: PrecisionRecall,
    /// Most probable terms per class
    pub top_terms: Vec<GroupTerms>,
}

/// Everything the analysis produces for the reporting sink
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub reviews: usize,
    pub word_frequencies: Vec<GroupTerms>,
    pub tfidf: Vec<GroupTerms>,
    pub sentiment_by_version: Option<CategoryScoreTable>,
    pub classification: ClassificationReport,
}

/// Review analysis pipeline
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    preprocessor: Preprocessor,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let preprocessor = Preprocessor::from_config(&config.normalizer)?;
        Ok(Self {
            config,
            preprocessor,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    /// Normalize review content, one document per review
    pub fn normalize(&self, reviews: &[Review]) -> Vec<Document> {
        self.preprocessor
            .normalize_all(reviews.iter().map(|r| r.content.as_str()))
    }

    /// Document-level matrix, trimmed by the configured thresholds
    pub fn document_matrix(&self, reviews: &[Review]) -> Dfm {
        let documents = self.normalize(reviews);
        let dfm = Dfm::build(&documents);
        let trimmed = dfm.trim(self.config.min_termfreq, self.config.min_docfreq);
        debug!(
            "Document matrix: {} rows, {} terms ({} before trimming)",
            trimmed.n_rows(),
            trimmed.n_terms(),
            dfm.n_terms()
        );
        trimmed
    }

    /// Most frequent terms per app, as within-app proportions
    pub fn word_frequencies(&self, reviews: &[Review]) -> Result<Vec<GroupTerms>> {
        let apps: Vec<&str> = reviews.iter().map(|r| r.app.as_str()).collect();
        let dfm = self.document_matrix(reviews);
        dfm.require_vocabulary()?;

        let grouped = dfm.group(&apps)?.weight(Weighting::Proportion);
        Ok(group_terms(&grouped, self.config.top_n))
    }

    /// Highest TF-IDF terms per app; terms common to every app weigh zero
    pub fn tfidf_by_app(&self, reviews: &[Review]) -> Result<Vec<GroupTerms>> {
        let apps: Vec<&str> = reviews.iter().map(|r| r.app.as_str()).collect();
        let dfm = self.document_matrix(reviews);
        dfm.require_vocabulary()?;

        let grouped = dfm.group(&apps)?.weight(Weighting::TfIdf {
            tf: self.config.tfidf_scheme,
            base: self.config.idf_base,
        });
        Ok(group_terms(&grouped, self.config.top_n))
    }

    /// Lexicon category shares per app version
    pub fn sentiment_by_version(
        &self,
        reviews: &[Review],
        lexicon: &EmotionLexicon,
    ) -> Result<CategoryScoreTable> {
        let versions: Vec<u32> = reviews.iter().map(|r| r.version).collect();
        let dfm = self.document_matrix(reviews);
        dfm.require_vocabulary()?;

        let grouped = dfm.group(&versions)?.weight(Weighting::Proportion);

        let lexicon = match self.preprocessor.stemmer() {
            Some(stemmer) => lexicon.stemmed(stemmer),
            None => lexicon.clone(),
        };

        let table = LexiconScorer::new(&self.config.categories).score(&grouped, &lexicon);
        info!(
            "Scored {} versions on {} categories",
            table.rows.len(),
            table.categories.len()
        );
        Ok(table)
    }

    /// Train on a seeded random split and evaluate on the held-out reviews
    pub fn classify(&self, reviews: &[Review]) -> Result<ClassificationReport> {
        let labels: Vec<&str> = reviews
            .iter()
            .map(|r| r.rating_class(self.config.high_score_threshold).as_str())
            .collect();

        let dfm = self.document_matrix(reviews);
        dfm.require_vocabulary()?;

        let (train_idx, test_idx) =
            train_test_split(reviews.len(), self.config.train_fraction, self.config.seed);
        if train_idx.is_empty() {
            return Err(Error::InsufficientData("training split is empty".into()));
        }
        if test_idx.is_empty() {
            warn!("Test split is empty; metrics will be undefined");
        }

        // Training vocabulary: terms seen in training rows only
        let train_dfm = dfm.select_rows(&train_idx)?.trim(1, 1);
        let train_labels: Vec<&str> = train_idx.iter().map(|&i| labels[i]).collect();
        let test_dfm = dfm.select_rows(&test_idx)?.match_terms(train_dfm.terms());
        let test_labels: Vec<&str> = test_idx.iter().map(|&i| labels[i]).collect();

        let model = NaiveBayes::new()
            .with_alpha(self.config.alpha)
            .with_classes(&RatingClass::LABELS)
            .train(&train_dfm, &train_labels)?;

        let predicted = model.predict(&test_dfm);
        let confusion = ConfusionMatrix::new(&predicted, &test_labels, &RatingClass::LABELS)?;
        let high = confusion.precision_recall(RatingClass::High.as_str())?;
        let accuracy = confusion.accuracy();

        let top_terms = model
            .classes()
            .iter()
            .map(|class| GroupTerms {
                group: class.clone(),
                terms: model.top_terms(class, self.config.top_n).unwrap_or_default(),
            })
            .collect();

        info!(
            "Naive Bayes: {} train / {} test reviews, accuracy {:.3}",
            train_idx.len(),
            test_idx.len(),
            accuracy
        );

        Ok(ClassificationReport {
            train_size: train_idx.len(),
            test_size: test_idx.len(),
            vocab_size: model.vocab_size(),
            confusion,
            accuracy,
            baseline_accuracy: majority_baseline(&test_labels),
            high,
            top_terms,
        })
    }

    /// Run every stage
    pub fn run(&self, reviews: &[Review], lexicon: Option<&EmotionLexicon>) -> Result<AnalysisReport> {
        info!("Analysing {} reviews", reviews.len());

        let word_frequencies = self.word_frequencies(reviews)?;
        let tfidf = self.tfidf_by_app(reviews)?;
        let sentiment_by_version = lexicon
            .map(|lexicon| self.sentiment_by_version(reviews, lexicon))
            .transpose()?;
        let classification = self.classify(reviews)?;

        Ok(AnalysisReport {
            reviews: reviews.len(),
            word_frequencies,
            tfidf,
            sentiment_by_version,
            classification,
        })
    }
}

fn group_terms(dfm: &Dfm, top_n: usize) -> Vec<GroupTerms> {
    dfm.top_features_by_row(top_n)
        .into_iter()
        .map(|(group, terms)| GroupTerms { group, terms })
        .collect()
}

/// Split `0..n` by an independent Bernoulli draw per index.
///
/// The same seed always gives the same split.
pub fn train_test_split(n: usize, train_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let p = train_fraction.clamp(0.0, 1.0);

    let mut train = Vec::new();
    let mut test = Vec::new();
    for idx in 0..n {
        if rng.gen::<f64>() < p {
            train.push(idx);
        } else {
            test.push(idx);
        }
    }
    (train, test)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NormalizerConfig;
    use approx::assert_abs_diff_eq;

    fn review(app: &str, content: &str, version: u32, score: u8) -> Review {
        Review {
            app: app.to_string(),
            content: content.to_string(),
            version,
            score,
        }
    }

    fn config() -> PipelineConfig {
        PipelineConfig::default()
            .with_trim(1, 1)
            .with_normalizer(NormalizerConfig {
                stem: false,
                ..NormalizerConfig::default()
            })
    }

    #[test]
    fn test_split_is_reproducible() {
        let (train_a, test_a) = train_test_split(200, 0.8, 42);
        let (train_b, test_b) = train_test_split(200, 0.8, 42);
        assert_eq!(train_a, train_b);
        assert_eq!(test_a, test_b);
        assert_eq!(train_a.len() + test_a.len(), 200);

        let (train_c, _) = train_test_split(200, 0.8, 7);
        assert_ne!(train_a, train_c);
    }

    #[test]
    fn test_split_extremes() {
        let (train, test) = train_test_split(10, 1.0, 1);
        assert_eq!(train.len(), 10);
        assert!(test.is_empty());
    }

    #[test]
    fn test_empty_review_gives_zero_row() {
        let pipeline = Pipeline::new(config()).unwrap();
        let reviews = vec![review("a", "love it", 1, 5), review("a", "", 1, 1)];

        let dfm = pipeline.document_matrix(&reviews);
        assert_eq!(dfm.n_rows(), 2);
        assert_eq!(dfm.row_totals()[1], 0.0);
    }

    #[test]
    fn test_document_frequency_trim_happens_before_grouping() {
        // "solo" occurs twice but in a single review, so min_docfreq = 2 drops
        // it even though the grouped "a" row would hold it twice
        let pipeline = Pipeline::new(config().with_trim(1, 2)).unwrap();
        let reviews = vec![review("a", "solo solo love", 1, 5), review("a", "love", 1, 4)];

        let freqs = pipeline.word_frequencies(&reviews).unwrap();
        assert_eq!(freqs.len(), 1);
        assert_eq!(freqs[0].group, "a");
        assert_eq!(freqs[0].terms.len(), 1);
        assert_eq!(freqs[0].terms[0].term, "love");
        assert!(freqs[0].terms.iter().all(|t| t.term != "solo"));
    }

    #[test]
    fn test_all_empty_reviews_fail_with_empty_vocabulary() {
        let pipeline = Pipeline::new(config()).unwrap();
        let reviews = vec![review("a", "", 1, 5), review("a", "the", 1, 1)];

        assert!(matches!(pipeline.classify(&reviews), Err(Error::EmptyVocabulary)));
        assert!(matches!(
            pipeline.word_frequencies(&reviews),
            Err(Error::EmptyVocabulary)
        ));
    }

    #[test]
    fn test_word_frequencies_by_app() {
        let pipeline = Pipeline::new(config().with_top_n(1)).unwrap();
        let reviews = vec![
            review("tinder", "love love matches", 3, 5),
            review("bumble", "crashes constantly", 2, 1),
            review("tinder", "love", 3, 4),
        ];

        let freqs = pipeline.word_frequencies(&reviews).unwrap();
        assert_eq!(freqs.len(), 2);
        assert_eq!(freqs[0].group, "bumble");
        assert_eq!(freqs[1].group, "tinder");
        assert_eq!(freqs[1].terms[0].term, "love");
        assert_abs_diff_eq!(freqs[1].terms[0].score, 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_sentiment_by_version() {
        let pipeline = Pipeline::new(config().with_categories(&["joy", "anger"])).unwrap();
        let lexicon = EmotionLexicon::from_pairs([("love", "joy"), ("hate", "anger")]);
        let reviews = vec![
            review("a", "love this", 10, 5),
            review("a", "hate this", 9, 1),
            review("a", "love and hate", 9, 3),
        ];

        let table = pipeline.sentiment_by_version(&reviews, &lexicon).unwrap();
        // "this" and "and" are stopwords
        assert_eq!(table.rows, vec!["9", "10"]);
        assert_abs_diff_eq!(table.get("10", "joy").unwrap(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(table.get("10", "anger").unwrap(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(table.get("9", "joy").unwrap(), 1.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(table.get("9", "anger").unwrap(), 2.0 / 3.0, epsilon = 1e-12);
    }
}
