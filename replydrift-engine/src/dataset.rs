//! Tweet dataset loading
//!
//! Datasets are JSON-lines dumps in the Twitter streaming format: one tweet
//! object per line, interleaved with deletion notices and the occasional
//! blank line. Only the fields needed for analysis are kept.

use crate::error::{EngineError, Result};
use crate::store::InMemoryStore;
use chrono::DateTime;
use replydrift_core::{Post, PostId};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// `created_at` layout used by the Twitter API
const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

#[derive(Debug, Deserialize)]
struct RawTweet {
    id: Option<u64>,
    text: Option<String>,
    extended_tweet: Option<ExtendedTweet>,
    timestamp_ms: Option<RawTimestamp>,
    created_at: Option<String>,
    in_reply_to_status_id: Option<u64>,
    user: Option<RawUser>,
}

#[derive(Debug, Deserialize)]
struct ExtendedTweet {
    full_text: String,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    id: u64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Number(i64),
    Text(String),
}

/// Counters from one load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Posts added to the store
    pub loaded: usize,
    /// Lines that were not tweets (blank, deletions, incomplete objects)
    pub skipped: usize,
    /// Tweets whose id was already stored
    pub duplicates: usize,
}

impl LoadStats {
    /// Add another load's counters
    pub fn merge(&mut self, other: LoadStats) {
        self.loaded += other.loaded;
        self.skipped += other.skipped;
        self.duplicates += other.duplicates;
    }
}

impl RawTweet {
    fn into_post(self) -> Option<Post> {
        let id = self.id?;
        let author_id = self.user?.id;
        let text = self
            .extended_tweet
            .map(|ext| ext.full_text)
            .or(self.text)?;
        let created_at = self.created_at.unwrap_or_default();

        let timestamp_ms = match self.timestamp_ms {
            Some(RawTimestamp::Number(ms)) => Some(ms),
            Some(RawTimestamp::Text(ms)) => ms.trim().parse().ok(),
            None => None,
        }
        .or_else(|| {
            DateTime::parse_from_str(&created_at, CREATED_AT_FORMAT)
                .ok()
                .map(|dt| dt.timestamp_millis())
        })?;

        Some(Post {
            id: PostId(id),
            author_id,
            text,
            timestamp_ms,
            created_at,
            in_reply_to: self.in_reply_to_status_id.map(PostId),
        })
    }
}

/// Read tweets from a JSON-lines reader into `store`
///
/// `origin` only labels errors.
pub fn load_reader<R: BufRead>(
    reader: R,
    origin: &Path,
    store: &mut InMemoryStore,
) -> Result<LoadStats> {
    let mut stats = LoadStats::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            stats.skipped += 1;
            continue;
        }

        let raw: RawTweet = serde_json::from_str(trimmed).map_err(|e| EngineError::Dataset {
            path: origin.to_path_buf(),
            line: index + 1,
            reason: e.to_string(),
        })?;

        match raw.into_post() {
            Some(post) => {
                if store.insert(post) {
                    stats.loaded += 1;
                } else {
                    stats.duplicates += 1;
                }
            }
            None => {
                log::debug!("{}:{}: not a complete tweet, skipped", origin.display(), index + 1);
                stats.skipped += 1;
            }
        }
    }

    Ok(stats)
}

/// Load one JSON-lines file into `store`
pub fn load_file(path: &Path, store: &mut InMemoryStore) -> Result<LoadStats> {
    let file = File::open(path)
        .map_err(|e| EngineError::IoError(format!("failed to open {}: {e}", path.display())))?;
    let stats = load_reader(BufReader::new(file), path, store)?;

    log::info!(
        "Loaded {} posts from {} ({} skipped, {} duplicates)",
        stats.loaded,
        path.display(),
        stats.skipped,
        stats.duplicates
    );
    Ok(stats)
}

/// Load several files into a fresh store
pub fn load_files<P: AsRef<Path>>(paths: &[P]) -> Result<(InMemoryStore, LoadStats)> {
    let mut store = InMemoryStore::new();
    let mut total = LoadStats::default();
    for path in paths {
        total.merge(load_file(path.as_ref(), &mut store)?);
    }
    Ok((store, total))
}
