//! Integration tests for the review text-mining pipeline

use review_text_mining::{
    config::{NormalizerConfig, PipelineConfig},
    data::ReviewLoader,
    error::RowRejection,
    evaluation::majority_baseline,
    nlp::Dfm,
    pipeline::{train_test_split, Pipeline},
    sentiment::{EmotionLexicon, NaiveBayes},
    RatingClass, Review,
};
use std::fmt::Write;

/// Twenty "love" reviews rated 5 and twenty "hate" reviews rated 1
fn love_hate_csv() -> String {
    let mut csv = String::from("app,content,reviewCreatedVersion,score\n");
    for i in 0..20 {
        writeln!(csv, "tinder,love love great app,{}.0.1,5", 10 + i % 3).unwrap();
        writeln!(csv, "bumble,hate hate awful crash app,{}.2,1", 10 + i % 3).unwrap();
    }
    csv
}

fn load(csv: &str) -> Vec<Review> {
    ReviewLoader::new()
        .load_reader(csv.as_bytes())
        .unwrap()
        .reviews
}

mod loading {
    use super::*;

    #[test]
    fn test_versions_and_rejections() {
        let csv = "\
app,content,reviewCreatedVersion,score
tinder,Great matches,13.0.2,5
tinder,No version,,4
bumble,,7,3
";
        let report = ReviewLoader::new().load_reader(csv.as_bytes()).unwrap();

        assert_eq!(report.reviews.len(), 2);
        assert_eq!(report.reviews[0].version, 13);
        assert_eq!(report.reviews[1].content, "");
        assert_eq!(report.rejected.get(&RowRejection::EmptyVersion), Some(&1));
        assert_eq!(report.total_rejected(), 1);
    }

    #[test]
    fn test_missing_column_fails() {
        let csv = "app,content,score\ntinder,hello,5\n";
        assert!(ReviewLoader::new().load_reader(csv.as_bytes()).is_err());
    }
}

mod classification {
    use super::*;

    #[test]
    fn test_separable_reviews_are_classified_perfectly() {
        let reviews = load(&love_hate_csv());
        let config = PipelineConfig::default()
            .with_train_fraction(0.5)
            .with_seed(7);
        let pipeline = Pipeline::new(config).unwrap();

        let report = pipeline.classify(&reviews).unwrap();

        assert_eq!(report.train_size + report.test_size, 40);
        assert!(report.test_size > 0);
        assert_eq!(report.accuracy, 1.0);
        assert_eq!(report.confusion.errors(), 0);
        assert_eq!(report.high.precision, 1.0);
        assert_eq!(report.high.recall, 1.0);

        let high_terms: Vec<&str> = report.top_terms[0]
            .terms
            .iter()
            .map(|t| t.term.as_str())
            .collect();
        assert_eq!(report.top_terms[0].group, "high");
        assert_eq!(high_terms[0], "love");
    }

    #[test]
    fn test_same_seed_same_report() {
        let reviews = load(&love_hate_csv());
        let pipeline = Pipeline::new(PipelineConfig::default().with_seed(3)).unwrap();

        let a = pipeline.classify(&reviews).unwrap();
        let b = pipeline.classify(&reviews).unwrap();
        assert_eq!(a.train_size, b.train_size);
        assert_eq!(a.confusion, b.confusion);
    }

    #[test]
    fn test_training_accuracy_beats_majority_baseline() {
        let csv = "\
app,content,reviewCreatedVersion,score
a,fast smooth matches,1,5
a,smooth design,1,4
a,fast login,1,5
a,crash after login,1,1
a,slow crash,1,2
a,great design but slow,1,4
";
        let reviews = load(csv);
        let pipeline = Pipeline::new(PipelineConfig::default().with_trim(1, 1)).unwrap();

        let labels: Vec<&str> = reviews
            .iter()
            .map(|r| r.rating_class(4).as_str())
            .collect();
        let dfm = pipeline.document_matrix(&reviews);
        let model = NaiveBayes::new()
            .with_classes(&RatingClass::LABELS)
            .train(&dfm, &labels)
            .unwrap();

        let predicted = model.predict(&dfm);
        let correct = predicted
            .iter()
            .zip(labels.iter())
            .filter(|(p, a)| p.as_str() == **a)
            .count();
        let accuracy = correct as f64 / labels.len() as f64;

        assert!(accuracy >= majority_baseline(&labels));
    }
}

mod features {
    use super::*;

    #[test]
    fn test_empty_content_is_a_zero_row() {
        let csv = "\
app,content,reviewCreatedVersion,score
tinder,love it,1,5
tinder,,1,3
";
        let reviews = load(csv);
        let pipeline = Pipeline::new(PipelineConfig::default().with_trim(1, 1)).unwrap();

        let documents = pipeline.normalize(&reviews);
        assert!(documents[1].is_empty());

        let dfm = Dfm::build(&documents);
        assert_eq!(dfm.n_rows(), 2);
        assert_eq!(dfm.row_totals(), vec![1.0, 0.0]);
    }

    #[test]
    fn test_tfidf_zeroes_terms_shared_by_every_app() {
        let reviews = load(&love_hate_csv());
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();

        let tfidf = pipeline.tfidf_by_app(&reviews).unwrap();
        assert_eq!(tfidf.len(), 2);
        for group in &tfidf {
            assert!(group.terms.iter().all(|t| t.score > 0.0));
            assert!(group.terms.iter().all(|t| t.term != "app"));
        }
    }

    #[test]
    fn test_bigrams() {
        let config = PipelineConfig::default().with_trim(1, 1).with_normalizer(NormalizerConfig {
            ngram_range: (2, 2),
            stem: false,
            ..NormalizerConfig::default()
        });
        let pipeline = Pipeline::new(config).unwrap();
        let reviews = load("app,content,reviewCreatedVersion,score\na,swipe right forever,1,5\n");

        let documents = pipeline.normalize(&reviews);
        assert_eq!(documents[0].tokens, vec!["swipe_right", "right_forever"]);
    }
}

mod report {
    use super::*;

    #[test]
    fn test_full_run_serializes() {
        let reviews = load(&love_hate_csv());
        let lexicon = EmotionLexicon::from_reader(
            "love\tjoy\t1\nhate\tanger\t1\nawful\tdisgust\t1\nawful\tjoy\t0\n".as_bytes(),
        )
        .unwrap();
        let pipeline = Pipeline::new(PipelineConfig::default().with_train_fraction(0.5)).unwrap();

        let report = pipeline.run(&reviews, Some(&lexicon)).unwrap();
        assert_eq!(report.reviews, 40);

        let sentiment = report.sentiment_by_version.as_ref().unwrap();
        assert_eq!(sentiment.rows, vec!["10", "11", "12"]);

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"word_frequencies\""));
        assert!(json.contains("\"confusion\""));
    }

    #[test]
    fn test_undefined_metrics_serialize_as_null() {
        let config = PipelineConfig::default()
            .with_trim(1, 1)
            .with_train_fraction(0.5)
            .with_seed(11);
        let (train, test) = train_test_split(20, 0.5, 11);
        assert!(train.len() >= 2);
        assert!(!test.is_empty());

        // Training rows alternate high/low, every held-out row is low
        let mut reviews: Vec<Review> = (0..20)
            .map(|_| Review {
                app: "tinder".to_string(),
                content: "hate awful crash".to_string(),
                version: 1,
                score: 1,
            })
            .collect();
        for &idx in train.iter().step_by(2) {
            reviews[idx].content = "love great matches".to_string();
            reviews[idx].score = 5;
        }

        let pipeline = Pipeline::new(config).unwrap();
        let report = pipeline.classify(&reviews).unwrap();
        assert_eq!(report.test_size, test.len());
        assert_eq!(report.accuracy, 1.0);
        assert!(report.high.precision.is_nan());
        assert!(report.high.recall.is_nan());

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"high\":{\"precision\":null,\"recall\":null,\"f1\":null}"));
    }
}
