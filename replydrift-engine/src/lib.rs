//! Reply drift analysis over stored conversations
//!
//! This crate connects the pure types of `replydrift-core` to data: a
//! [`DocumentStore`] to look posts up by id, a [`SentimentScorer`] to turn
//! text into a score, dataset loading for JSON-lines tweet dumps, and the
//! [`Analyzer`] facade producing per-account, per-bucket and per-topic
//! reports.
//!
//! # Example
//!
//! ```rust
//! use replydrift_core::{ConversationTree, Post};
//! use replydrift_engine::{FnScorer, InMemoryStore, SentimentAggregator};
//!
//! let store: InMemoryStore = vec![
//!     Post::new(1u64, 10, "0.0", 0),
//!     Post::new(2u64, 20, "0.5", 1).reply_to(1u64),
//! ]
//! .into_iter()
//! .collect();
//! let tree = ConversationTree::from_replies(1u64, [(2u64, 1u64)]).unwrap();
//!
//! let scorer = FnScorer(|text: &str| text.parse::<f64>().unwrap_or(0.0));
//! let aggregator = SentimentAggregator::new(&store, scorer);
//! assert_eq!(aggregator.average_sentiment(&[tree]).unwrap(), 0.5);
//! ```

#![warn(missing_docs)]

pub mod aggregator;
pub mod analyzer;
pub mod bucketing;
pub mod config;
pub mod conversation;
pub mod dataset;
pub mod error;
pub mod progress;
pub mod sentiment;
pub mod store;
pub mod topics;

// Re-export key types
pub use aggregator::SentimentAggregator;
pub use analyzer::{AccountLength, AccountSentiment, Analyzer, AnalyzerBuilder};
pub use bucketing::{
    bucket_sentiment, bucket_trees, count_posts, count_posts_by_day_of_year, BucketReport,
    BucketRow, Buckets,
};
pub use config::{Account, AnalysisConfig, AnalysisConfigBuilder, EmptyBucketPolicy, TopicMap};
pub use conversation::{ConversationSource, ReplyIndex, RootFilter};
pub use dataset::{load_file, load_files, load_reader, LoadStats};
pub use error::{EngineError, Result};
pub use progress::{AggregateSummary, LogProgress, NoProgress, ProgressObserver, ProgressSnapshot, Stage};
pub use sentiment::{FnScorer, LexiconScorer, SentimentScorer};
pub use store::{DocumentStore, InMemoryStore};
pub use topics::{topic_report, TopicMatcher, TopicReport};

// Re-export from core for convenience
pub use replydrift_core::{
    BucketKey, ConversationTree, DayOfYear, HourOfDay, LeapDayPolicy, Post, PostId,
    TimeSettings, Weekday,
};
