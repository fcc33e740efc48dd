//! Conversation trees and pooled sentiment deltas
//!
//! This crate holds the deterministic part of reply drift analysis: post
//! records, the reply tree a conversation forms, the pooled `(sum, count)`
//! accumulator used to compare leaf replies against their root, and the
//! calendar labels conversations are bucketed by.
//!
//! Nothing here performs I/O. Document lookup and sentiment scoring live in
//! `replydrift-engine`.
//!
//! # Example
//!
//! ```rust
//! use replydrift_core::{ConversationTree, DeltaAccumulator};
//!
//! let tree = ConversationTree::from_replies(1u64, [(2u64, 1u64), (3, 2)]).unwrap();
//! assert_eq!(tree.leaves().count(), 1);
//!
//! let mut acc = DeltaAccumulator::new();
//! acc.push(0.5);
//! acc.push(-0.1);
//! assert!((acc.mean().unwrap() - 0.2).abs() < 1e-12);
//! ```

#![warn(missing_docs)]

pub mod calendar;
pub mod error;
pub mod post;
pub mod stats;
pub mod tree;

pub use calendar::{
    zeroed_buckets, BucketKey, DayOfYear, HourOfDay, LeapDayPolicy, TimeSettings, Weekday,
};
pub use error::{CoreError, Result};
pub use post::{Post, PostId};
pub use stats::{DeltaAccumulator, DeltaSamples, Histogram, DEFAULT_HISTOGRAM_BINS};
pub use tree::{ConversationTree, Descendants, Node};
