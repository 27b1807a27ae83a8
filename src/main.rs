//! CLI for review text mining
//!
//! Usage:
//! ```bash
//! cargo run -- --help
//! cargo run -- --input reviews.csv frequencies
//! cargo run -- --input reviews.csv sentiment --lexicon nrc.txt
//! cargo run -- --input reviews.csv report --output report.json
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use review_text_mining::{
    nlp::{Dfm, Weighting},
    pipeline::GroupTerms,
    EmotionLexicon, Pipeline, PipelineConfig, Preprocessor, Review, ReviewLoader, Tokenizer,
};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "review_mining")]
#[command(author = "ML for Trading")]
#[command(version = "0.1.0")]
#[command(about = "Text mining of app-store reviews", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Review table (CSV with app, content, reviewCreatedVersion, score)
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Logging level
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Most frequent terms per app
    Frequencies,

    /// Most distinctive terms per app (TF-IDF)
    Tfidf,

    /// Emotion scores per app version
    Sentiment {
        /// Lexicon file: term<TAB>category<TAB>flag
        #[arg(long)]
        lexicon: PathBuf,
    },

    /// Train and evaluate the rating classifier
    Classify,

    /// Run every stage and write a JSON report
    Report {
        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Lexicon file for the emotion stage
        #[arg(long)]
        lexicon: Option<PathBuf>,
    },

    /// Show each normalization stage on a single text
    Demo {
        /// Text to normalize
        #[arg(short, long, default_value = "I LOVED the new update!!! Matches load 10x faster :)")]
        text: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.as_str() {
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    let pipeline = Pipeline::new(config).context("invalid pipeline configuration")?;

    match cli.command {
        Commands::Frequencies => {
            let reviews = load_reviews(cli.input.as_deref(), &pipeline)?;
            let freqs = pipeline.word_frequencies(&reviews)?;
            print_group_terms("Word frequencies (share of app tokens)", &freqs);
        }
        Commands::Tfidf => {
            let reviews = load_reviews(cli.input.as_deref(), &pipeline)?;
            let tfidf = pipeline.tfidf_by_app(&reviews)?;
            print_group_terms("TF-IDF by app", &tfidf);
        }
        Commands::Sentiment { lexicon } => {
            let reviews = load_reviews(cli.input.as_deref(), &pipeline)?;
            let lexicon = load_lexicon(&lexicon)?;
            let table = pipeline.sentiment_by_version(&reviews, &lexicon)?;
            println!("\nEmotion shares by version\n");
            println!("{}", table);
        }
        Commands::Classify => {
            let reviews = load_reviews(cli.input.as_deref(), &pipeline)?;
            run_classify(&pipeline, &reviews)?;
        }
        Commands::Report { output, lexicon } => {
            let reviews = load_reviews(cli.input.as_deref(), &pipeline)?;
            let lexicon = lexicon.as_deref().map(load_lexicon).transpose()?;
            let report = pipeline.run(&reviews, lexicon.as_ref())?;

            let file = File::create(&output)
                .with_context(|| format!("failed to create {}", output.display()))?;
            serde_json::to_writer_pretty(file, &report)?;
            info!("Report written to {}", output.display());
        }
        Commands::Demo { text } => {
            run_demo(&pipeline, &text)?;
        }
    }

    Ok(())
}

fn load_reviews(input: Option<&Path>, pipeline: &Pipeline) -> Result<Vec<Review>> {
    let Some(path) = input else {
        bail!("--input is required for this command");
    };

    let loader = ReviewLoader::new().with_delimiter(pipeline.config().delimiter_byte()?);
    let report = loader
        .load_path(path)
        .with_context(|| format!("failed to load reviews from {}", path.display()))?;

    for (reason, count) in &report.rejected {
        info!("Dropped {} rows: {}", count, reason);
    }
    Ok(report.reviews)
}

fn load_lexicon(path: &Path) -> Result<EmotionLexicon> {
    let lexicon = EmotionLexicon::from_path(path)
        .with_context(|| format!("failed to load lexicon {}", path.display()))?;
    info!("Loaded lexicon with {} terms", lexicon.len());
    Ok(lexicon)
}

fn print_group_terms(title: &str, groups: &[GroupTerms]) {
    println!("\n{}\n", title);
    for group in groups {
        println!("{}", group.group);
        for scored in &group.terms {
            println!("  {:<24} {:.4}", scored.term, scored.score);
        }
        println!();
    }
}

fn run_classify(pipeline: &Pipeline, reviews: &[Review]) -> Result<()> {
    let report = pipeline.classify(reviews)?;

    println!("\nNaive Bayes rating classifier\n");
    println!("Train reviews: {}", report.train_size);
    println!("Test reviews:  {}", report.test_size);
    println!("Vocabulary:    {}\n", report.vocab_size);
    println!("{}", report.confusion);
    println!("Accuracy:          {:.3}", report.accuracy);
    println!("Majority baseline: {:.3}", report.baseline_accuracy);
    println!("Precision (high):  {:.3}", report.high.precision);
    println!("Recall (high):     {:.3}", report.high.recall);
    println!("F1 (high):         {:.3}", report.high.f1);

    print_group_terms("Most probable terms per class", &report.top_terms);
    Ok(())
}

fn run_demo(pipeline: &Pipeline, text: &str) -> Result<()> {
    let normalizer = &pipeline.config().normalizer;

    println!("\nNormalization demo\n");
    println!("Input text: \"{}\"\n", text);

    println!("1. TOKENIZATION");
    let tokens = Tokenizer::new()
        .remove_punctuation(normalizer.remove_punctuation)
        .remove_symbols(normalizer.remove_symbols)
        .remove_numbers(normalizer.remove_numbers)
        .tokenize(text);
    println!("   {:?}", tokens);

    println!("\n2. STOPWORDS, STEMMING, N-GRAMS");
    let processed = pipeline.preprocessor().process(&tokens);
    println!("   {:?}", processed);

    println!("\n3. UNSTEMMED");
    let unstemmed = Preprocessor::from_config(normalizer)?
        .with_stemming(false)
        .normalize(text);
    println!("   {:?}", unstemmed.tokens);

    println!("\n4. DOCUMENT-FEATURE ROW");
    let document = pipeline.preprocessor().normalize(text);
    let dfm = Dfm::build(&[document]).weight(Weighting::Proportion);
    for scored in dfm.top_features(dfm.n_terms()) {
        println!("   {:<24} {:.3}", scored.term, scored.score);
    }

    println!("\nDemo complete\n");
    Ok(())
}
