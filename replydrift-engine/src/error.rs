//! Layered error types
//!
//! Deterministic failures come from `replydrift-core` as [`CoreError`]; this
//! layer adds lookups, dataset parsing and configuration.

use replydrift_core::{CoreError, PostId};
use std::path::PathBuf;
use thiserror::Error;

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Core algorithm error
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// A post referenced by a tree is absent from the document store
    #[error("missing record: post {id} not found in the document store")]
    MissingRecord {
        /// The post that could not be fetched
        id: PostId,
    },

    /// A bucket had nothing to aggregate
    #[error("bucket '{label}' cannot be aggregated: {source}")]
    EmptyBucket {
        /// Display form of the bucket label
        label: String,
        /// Underlying aggregation failure
        #[source]
        source: CoreError,
    },

    /// A dataset file could not be parsed
    #[error("dataset error in {}:{line}: {reason}", .path.display())]
    Dataset {
        /// The dataset file
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// What went wrong
        reason: String,
    },

    /// Account id not present in the configuration
    #[error("account {id} is not configured")]
    UnknownAccount {
        /// The requested account id
        id: u64,
    },

    /// Topic name not present in the configuration
    #[error("topic '{name}' is not configured")]
    UnknownTopic {
        /// The requested topic
        name: String,
    },

    /// Configuration error
    #[error("invalid configuration: {0}")]
    ConfigError(String),

    /// Lexicon could not be loaded
    #[error("lexicon error: {0}")]
    Lexicon(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::IoError(err.to_string())
    }
}

impl EngineError {
    /// Attach a bucket label to a division-by-zero failure
    pub(crate) fn for_bucket(self, label: impl ToString) -> Self {
        match self {
            EngineError::Core(CoreError::DivisionByZero) => EngineError::EmptyBucket {
                label: label.to_string(),
                source: CoreError::DivisionByZero,
            },
            other => other,
        }
    }

    /// Whether this error is an empty aggregation pool
    pub fn is_empty_pool(&self) -> bool {
        matches!(
            self,
            EngineError::Core(CoreError::DivisionByZero)
                | EngineError::EmptyBucket {
                    source: CoreError::DivisionByZero,
                    ..
                }
        )
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
