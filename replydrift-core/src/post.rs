//! Post identifiers and stored post records

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique key of a post in the document store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub u64);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PostId {
    fn from(id: u64) -> Self {
        PostId(id)
    }
}

/// A stored post record
///
/// Records are immutable once loaded. Analysis code fetches them on demand
/// from a document store and never keeps them beyond one comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Post identifier
    pub id: PostId,
    /// Account that authored the post
    pub author_id: u64,
    /// Raw post text
    pub text: String,
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: i64,
    /// Textual creation time as found in the dataset
    #[serde(default)]
    pub created_at: String,
    /// Parent post when this post is a reply
    #[serde(default)]
    pub in_reply_to: Option<PostId>,
}

impl Post {
    /// Create a top-level post
    pub fn new(id: impl Into<PostId>, author_id: u64, text: impl Into<String>, timestamp_ms: i64) -> Self {
        Self {
            id: id.into(),
            author_id,
            text: text.into(),
            timestamp_ms,
            created_at: String::new(),
            in_reply_to: None,
        }
    }

    /// Mark this post as a reply to `parent`
    pub fn reply_to(mut self, parent: impl Into<PostId>) -> Self {
        self.in_reply_to = Some(parent.into());
        self
    }

    /// Set the textual creation time
    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = created_at.into();
        self
    }

    /// Whether this post replies to another post
    pub fn is_reply(&self) -> bool {
        self.in_reply_to.is_some()
    }
}
