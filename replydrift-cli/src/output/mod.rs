//! Output formatting module

use anyhow::Result;
use replydrift_engine::{
    Account, AccountLength, AccountSentiment, BucketKey, BucketReport, Buckets, TopicReport,
};
use serde::{Deserialize, Serialize};
use std::io::Write;

pub mod json;
pub mod markdown;
pub mod text;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned plain text
    Text,
    /// JSON array of report objects
    Json,
    /// Markdown tables
    Markdown,
}

impl OutputFormat {
    /// Every format with a short description
    pub fn describe_all() -> [(&'static str, &'static str); 3] {
        [
            ("text", "Aligned plain text, one line per row"),
            ("json", "JSON array of report objects"),
            ("markdown", "Markdown tables"),
        ]
    }
}

/// One row of a [`BucketTable`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketLine {
    /// Display form of the label
    pub label: String,
    /// Trees in the bucket (sentiment tables only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trees: Option<usize>,
    /// Pooled mean delta (sentiment tables only; absent when skipped)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
    /// Posts in the bucket (activity tables only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts: Option<u64>,
}

/// Calendar buckets of one account, flattened for output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketTable {
    /// Account the buckets belong to
    pub account: Account,
    /// Grouping name
    pub grouping: String,
    /// `sentiment` or `posts`
    pub measure: &'static str,
    /// Rows in label order
    pub rows: Vec<BucketLine>,
}

impl BucketTable {
    /// Table from a sentiment bucket report
    pub fn from_sentiment<K: BucketKey>(account: Account, report: &BucketReport<K>) -> Self {
        Self {
            account,
            grouping: report.grouping.to_string(),
            measure: "sentiment",
            rows: report
                .rows
                .iter()
                .map(|row| BucketLine {
                    label: row.label.to_string(),
                    trees: Some(row.trees),
                    average: row.average,
                    posts: None,
                })
                .collect(),
        }
    }

    /// Table from post counts
    pub fn from_counts<K: BucketKey>(account: Account, counts: &Buckets<K, u64>) -> Self {
        Self {
            account,
            grouping: K::GROUPING.to_string(),
            measure: "posts",
            rows: counts
                .iter()
                .map(|(label, posts)| BucketLine {
                    label: label.to_string(),
                    trees: None,
                    average: None,
                    posts: Some(*posts),
                })
                .collect(),
        }
    }
}

/// Topic reports of one account
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicTable {
    /// Account the conversations belong to
    pub account: Account,
    /// One report per topic
    pub topics: Vec<TopicReport>,
}

/// Trait for report formatters
pub trait ReportFormatter: Send + Sync {
    /// Per-account pooled sentiment
    fn account_sentiment(&mut self, rows: &[AccountSentiment]) -> Result<()>;

    /// Per-account conversation lengths
    fn account_lengths(&mut self, rows: &[AccountLength]) -> Result<()>;

    /// Calendar buckets of one account
    fn buckets(&mut self, table: &BucketTable) -> Result<()>;

    /// Topic reports of one account
    fn topics(&mut self, table: &TopicTable) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

/// Formatter for `format` writing to `writer`
pub fn create_formatter<'w, W: Write + Send + Sync + 'w>(
    format: OutputFormat,
    writer: W,
    pretty_json: bool,
    precision: usize,
) -> Box<dyn ReportFormatter + 'w> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(writer, precision)),
        OutputFormat::Json => Box::new(JsonFormatter::new(writer, pretty_json)),
        OutputFormat::Markdown => Box::new(MarkdownFormatter::new(writer, precision)),
    }
}

/// `+0.1234` style number, or `-` for a missing value
pub(crate) fn signed(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(value) => format!("{value:+.precision$}"),
        None => "-".to_string(),
    }
}
