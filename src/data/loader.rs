//! Review record loading
//!
//! Reads delimited review exports, keeps the `app`, `content`,
//! `reviewCreatedVersion` and `score` columns and drops malformed rows.

use crate::error::{Error, Result, RowRejection};
use crate::models::Review;
use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Columns that must be present in the header row
pub const REQUIRED_COLUMNS: [&str; 4] = ["app", "content", "reviewCreatedVersion", "score"];

/// Projection of one input row onto the columns we use
#[derive(Debug, Deserialize)]
struct RawReview {
    app: String,
    content: String,
    #[serde(rename = "reviewCreatedVersion")]
    review_created_version: String,
    score: String,
}

/// Outcome of loading a review table
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Surviving reviews, in input order
    pub reviews: Vec<Review>,
    /// Number of dropped rows per reason
    pub rejected: BTreeMap<RowRejection, usize>,
}

impl LoadReport {
    pub fn total_rejected(&self) -> usize {
        self.rejected.values().sum()
    }
}

/// Loader for review tables
#[derive(Debug, Clone)]
pub struct ReviewLoader {
    delimiter: u8,
}

impl ReviewLoader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    /// Set the field delimiter (`,` by default)
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Load reviews from a file
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<LoadReport> {
        let file = File::open(&path)?;
        debug!("Reading reviews from {:?}", path.as_ref());
        self.load_reader(file)
    }

    /// Load reviews from any reader with a header row
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<LoadReport> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        check_headers(&headers)?;

        let mut report = LoadReport::default();
        let mut record = StringRecord::new();
        let mut line = 1u64;

        loop {
            match reader.read_record(&mut record) {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) => {
                    if matches!(err.kind(), csv::ErrorKind::Io(_)) {
                        return Err(err.into());
                    }
                    line = err.position().map(|p| p.line()).unwrap_or(line + 1);
                    reject(&mut report, line, RowRejection::Undecodable);
                    continue;
                }
            }
            line = record.position().map(|p| p.line()).unwrap_or(line + 1);

            let parsed = record
                .deserialize::<RawReview>(Some(&headers))
                .map_err(|_| Error::MalformedRow {
                    line,
                    reason: RowRejection::Undecodable,
                })
                .and_then(|raw| parse_review(raw, line));

            match parsed {
                Ok(review) => report.reviews.push(review),
                Err(Error::MalformedRow { line, reason }) => reject(&mut report, line, reason),
                Err(other) => return Err(other),
            }
        }

        info!(
            "Loaded {} reviews, dropped {} malformed rows",
            report.reviews.len(),
            report.total_rejected()
        );

        Ok(report)
    }
}

impl Default for ReviewLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn check_headers(headers: &StringRecord) -> Result<()> {
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(Error::MissingColumn(column.to_string()));
        }
    }
    Ok(())
}

fn reject(report: &mut LoadReport, line: u64, reason: RowRejection) {
    debug!("Dropping row at line {}: {}", line, reason);
    *report.rejected.entry(reason).or_insert(0) += 1;
}

/// Parse the leading integer of a dotted version string ("13.0.2" -> 13)
pub fn parse_version(version: &str) -> std::result::Result<u32, RowRejection> {
    let version = version.trim();
    if version.is_empty() {
        return Err(RowRejection::EmptyVersion);
    }

    version
        .split('.')
        .next()
        .and_then(|major| major.trim().parse::<u32>().ok())
        .ok_or(RowRejection::UnparsableVersion)
}

/// True when every byte of the text is in 1..=127
pub fn is_plain_ascii(text: &str) -> bool {
    text.bytes().all(|b| (1..=127).contains(&b))
}

fn parse_review(raw: RawReview, line: u64) -> Result<Review> {
    let malformed = |reason| Error::MalformedRow { line, reason };

    let version = parse_version(&raw.review_created_version).map_err(malformed)?;

    if !is_plain_ascii(&raw.content) {
        return Err(malformed(RowRejection::NonAsciiContent));
    }

    let score = raw
        .score
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|s| (1..=5).contains(s))
        .ok_or_else(|| malformed(RowRejection::InvalidScore))?;

    Ok(Review {
        app: raw.app,
        content: raw.content,
        version,
        score,
    })
}
