//! Calendar bucketing of conversation trees
//!
//! Trees are grouped by a label derived from the timestamp of their root
//! post. Every bucket map starts from the full label set of the key type, so
//! buckets without trees are still present and visible to the empty-bucket
//! policy.

use crate::aggregator::SentimentAggregator;
use crate::config::EmptyBucketPolicy;
use crate::error::{EngineError, Result};
use crate::progress::{ProgressObserver, ProgressSnapshot, Stage};
use crate::sentiment::SentimentScorer;
use crate::store::DocumentStore;
use replydrift_core::{zeroed_buckets, BucketKey, ConversationTree, DayOfYear, TimeSettings};
use serde::Serialize;
use std::borrow::Borrow;
use std::collections::BTreeMap;

/// Label to bucket content, ordered by label
pub type Buckets<K, V> = BTreeMap<K, V>;

/// Day-of-year counting reports progress this many times less often
const COUNTING_PROGRESS_FACTOR: usize = 10;

/// One bucket of a [`BucketReport`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketRow<K> {
    /// Bucket label
    pub label: K,
    /// Trees in the bucket
    pub trees: usize,
    /// Leaves that contributed a delta
    pub leaves: u64,
    /// Pooled mean delta; `None` for a skipped empty bucket
    pub average: Option<f64>,
}

/// Pooled sentiment per calendar bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketReport<K> {
    /// Name of the grouping, e.g. `weekday`
    pub grouping: &'static str,
    /// One row per label, in label order
    pub rows: Vec<BucketRow<K>>,
}

impl<K: BucketKey> BucketReport<K> {
    /// Average of the bucket labelled `label`
    pub fn average(&self, label: K) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .and_then(|row| row.average)
    }

    /// Labels whose bucket was empty and skipped
    pub fn skipped(&self) -> impl Iterator<Item = K> + '_ {
        self.rows
            .iter()
            .filter(|row| row.average.is_none())
            .map(|row| row.label)
    }
}

/// Group trees by the label of their root's timestamp
///
/// The result holds references into `trees`; nothing is copied.
pub fn bucket_trees<'t, K, S, T>(
    store: &S,
    trees: &'t [T],
    time: &TimeSettings,
) -> Result<Buckets<K, Vec<&'t ConversationTree>>>
where
    K: BucketKey,
    S: DocumentStore + ?Sized,
    T: Borrow<ConversationTree>,
{
    let mut buckets: Buckets<K, Vec<&'t ConversationTree>> = zeroed_buckets();

    for tree in trees {
        let tree: &'t ConversationTree = tree.borrow();
        let root = store.fetch(tree.root().id())?;
        let label = K::from_timestamp(root.timestamp_ms, time)?;
        buckets.entry(label).or_default().push(tree);
    }

    Ok(buckets)
}

/// Pooled leaf-versus-root sentiment per bucket
pub fn bucket_sentiment<K, S, C, T>(
    aggregator: &SentimentAggregator<'_, S, C>,
    trees: &[T],
    time: &TimeSettings,
    policy: EmptyBucketPolicy,
) -> Result<BucketReport<K>>
where
    K: BucketKey,
    S: DocumentStore,
    C: SentimentScorer,
    T: Borrow<ConversationTree>,
{
    let buckets: Buckets<K, Vec<&ConversationTree>> =
        bucket_trees(aggregator.store(), trees, time)?;
    let mut rows = Vec::with_capacity(buckets.len());

    for (label, members) in buckets {
        log::debug!("{} {label}: {} trees", K::GROUPING, members.len());

        let pool = aggregator.accumulate(&members)?;
        let average = match pool.mean() {
            Ok(average) => Some(average),
            Err(err) => match policy {
                EmptyBucketPolicy::Fail => {
                    return Err(EngineError::from(err).for_bucket(label));
                }
                EmptyBucketPolicy::Skip => {
                    log::warn!("Skipping empty {} bucket {label}", K::GROUPING);
                    None
                }
            },
        };

        rows.push(BucketRow {
            label,
            trees: members.len(),
            leaves: pool.count(),
            average,
        });
    }

    Ok(BucketReport {
        grouping: K::GROUPING,
        rows,
    })
}

/// Number of posts per bucket: every tree adds its replies plus its root
pub fn count_posts<K, S, T>(
    store: &S,
    trees: &[T],
    time: &TimeSettings,
    observer: &dyn ProgressObserver,
    progress_interval: usize,
) -> Result<Buckets<K, u64>>
where
    K: BucketKey,
    S: DocumentStore + ?Sized,
    T: Borrow<ConversationTree>,
{
    let interval = progress_interval.max(1).saturating_mul(COUNTING_PROGRESS_FACTOR);
    let mut counts: Buckets<K, u64> = zeroed_buckets();
    let mut counted = 0u64;
    observer.on_start(Stage::Counting, trees.len());

    for (index, tree) in trees.iter().enumerate() {
        let tree = tree.borrow();
        let root = store.fetch(tree.root().id())?;
        let label = K::from_timestamp(root.timestamp_ms, time)?;
        let posts = tree.post_count() as u64;
        *counts.entry(label).or_default() += posts;
        counted += posts;

        let processed = index + 1;
        if processed % interval == 0 {
            observer.on_progress(&ProgressSnapshot {
                stage: Stage::Counting,
                trees_processed: processed,
                total_trees: trees.len(),
                contributions: counted,
                running_average: None,
            });
        }
    }

    Ok(counts)
}

/// Number of posts per day of the year
pub fn count_posts_by_day_of_year<S, T>(
    store: &S,
    trees: &[T],
    time: &TimeSettings,
    observer: &dyn ProgressObserver,
    progress_interval: usize,
) -> Result<Buckets<DayOfYear, u64>>
where
    S: DocumentStore + ?Sized,
    T: Borrow<ConversationTree>,
{
    count_posts(store, trees, time, observer, progress_interval)
}
