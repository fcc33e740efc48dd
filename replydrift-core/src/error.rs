//! Core error types (deterministic only)

use crate::post::PostId;
use core::fmt;

/// Core errors (no I/O, no external failures)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A pooled mean was requested over zero contributions
    DivisionByZero,
    /// A reply referenced a parent that is not part of the tree
    UnknownParent {
        /// The missing parent
        parent: PostId,
    },
    /// A post was inserted into a tree twice
    DuplicatePost {
        /// The repeated post
        id: PostId,
    },
    /// A millisecond timestamp outside the representable calendar range
    InvalidTimestamp {
        /// The offending timestamp
        timestamp_ms: i64,
    },
    /// A UTC offset chrono cannot represent
    InvalidUtcOffset {
        /// Offset in minutes east of UTC
        minutes: i32,
    },
    /// Day 366 of a leap year while leap days are rejected
    LeapDayOutOfRange,
    /// Histogram parameters that cannot produce bins
    InvalidHistogram {
        /// What was wrong
        reason: String,
    },
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::DivisionByZero => {
                write!(f, "division by zero: no leaf replies contributed to the pool")
            }
            CoreError::UnknownParent { parent } => {
                write!(f, "reply parent {parent} is not part of the tree")
            }
            CoreError::DuplicatePost { id } => write!(f, "post {id} already in the tree"),
            CoreError::InvalidTimestamp { timestamp_ms } => {
                write!(f, "timestamp {timestamp_ms}ms is out of range")
            }
            CoreError::InvalidUtcOffset { minutes } => {
                write!(f, "UTC offset of {minutes} minutes is out of range")
            }
            CoreError::LeapDayOutOfRange => write!(f, "day 366 is outside the 365 day buckets"),
            CoreError::InvalidHistogram { reason } => write!(f, "invalid histogram: {reason}"),
        }
    }
}

impl std::error::Error for CoreError {}

/// Result type for core operations
pub type Result<T> = core::result::Result<T, CoreError>;
