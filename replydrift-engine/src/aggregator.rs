//! Leaf-versus-root sentiment aggregation
//!
//! For every tree the root post is fetched and scored once; every leaf reply
//! is then fetched, scored and compared against it. Deltas from all trees go
//! into one pool, so a tree with many leaves weighs more than a tree with
//! one. Internal replies (replies that were themselves answered) never
//! contribute.

use crate::config::DEFAULT_PROGRESS_INTERVAL;
use crate::error::Result;
use crate::progress::{AggregateSummary, NoProgress, ProgressObserver, ProgressSnapshot, Stage};
use crate::sentiment::SentimentScorer;
use crate::store::DocumentStore;
use replydrift_core::{ConversationTree, DeltaAccumulator, DeltaSamples};
use std::borrow::Borrow;

static NO_PROGRESS: NoProgress = NoProgress;

/// Pooled sentiment-delta aggregation over conversation trees
pub struct SentimentAggregator<'a, S, C> {
    store: S,
    scorer: C,
    observer: &'a dyn ProgressObserver,
    progress_interval: usize,
}

impl<'a, S: DocumentStore, C: SentimentScorer> SentimentAggregator<'a, S, C> {
    /// Aggregator without progress reporting
    pub fn new(store: S, scorer: C) -> Self {
        Self {
            store,
            scorer,
            observer: &NO_PROGRESS,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Report progress to `observer`
    pub fn with_observer(mut self, observer: &'a dyn ProgressObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Report every `interval` trees (values below 1 are treated as 1)
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    /// The underlying document store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The configured observer
    pub fn observer(&self) -> &'a dyn ProgressObserver {
        self.observer
    }

    /// Trees between two progress reports
    pub fn progress_interval(&self) -> usize {
        self.progress_interval
    }

    /// Score of a tree's root post
    pub fn root_score(&self, tree: &ConversationTree) -> Result<f64> {
        let root = self.store.fetch(tree.root().id())?;
        Ok(self.scorer.score(&root.text))
    }

    /// Pooled mean of `leaf - root` over every leaf of every tree
    ///
    /// Fails with a division-by-zero error when no tree has a leaf, which
    /// includes empty input.
    pub fn average_sentiment<T: Borrow<ConversationTree>>(&self, trees: &[T]) -> Result<f64> {
        Ok(self.accumulate(trees)?.mean()?)
    }

    /// Run the traversal and return the raw `(sum, count)` pool
    pub fn accumulate<T: Borrow<ConversationTree>>(&self, trees: &[T]) -> Result<DeltaAccumulator> {
        let mut pool = DeltaAccumulator::new();
        self.traverse(trees, |delta| pool.push(delta), |_| {})?;
        Ok(pool)
    }

    /// Every delta and every root score, for distributions
    pub fn collect_deltas<T: Borrow<ConversationTree>>(&self, trees: &[T]) -> Result<DeltaSamples> {
        let mut deltas = Vec::new();
        let mut root_scores = Vec::with_capacity(trees.len());
        self.traverse(
            trees,
            |delta| deltas.push(delta),
            |root| root_scores.push(root),
        )?;
        Ok(DeltaSamples {
            deltas,
            root_scores,
        })
    }

    fn traverse<T, L, R>(&self, trees: &[T], mut on_leaf: L, mut on_root: R) -> Result<()>
    where
        T: Borrow<ConversationTree>,
        L: FnMut(f64),
        R: FnMut(f64),
    {
        let total = trees.len();
        let mut pool = DeltaAccumulator::new();
        self.observer.on_start(Stage::Sentiment, total);

        for (index, tree) in trees.iter().enumerate() {
            let tree = tree.borrow();
            let root_score = self.root_score(tree)?;
            on_root(root_score);

            for leaf in tree.leaves() {
                let post = self.store.fetch(leaf.id())?;
                let delta = self.scorer.score(&post.text) - root_score;
                pool.push(delta);
                on_leaf(delta);
            }

            let processed = index + 1;
            if processed % self.progress_interval == 0 {
                self.observer.on_progress(&ProgressSnapshot {
                    stage: Stage::Sentiment,
                    trees_processed: processed,
                    total_trees: total,
                    contributions: pool.count(),
                    running_average: pool.running_mean(),
                });
            }
        }

        self.observer.on_complete(&AggregateSummary {
            trees: total,
            leaves: pool.count(),
            sum: pool.sum(),
            average: pool.running_mean(),
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::progress::testing::RecordingObserver;
    use crate::sentiment::FnScorer;
    use crate::store::InMemoryStore;
    use replydrift_core::{CoreError, Post, PostId};

    fn parse_score(text: &str) -> f64 {
        text.parse().unwrap_or(0.0)
    }

    /// Scorer reading the score straight from the post text
    fn numeric() -> FnScorer<fn(&str) -> f64> {
        FnScorer(parse_score as fn(&str) -> f64)
    }

    fn post(id: u64, score: f64) -> Post {
        Post::new(id, 1, score.to_string(), 0)
    }

    #[test]
    fn test_single_tree_mean_of_leaf_deltas() {
        let store: InMemoryStore = vec![post(1, 1.0), post(2, 3.0), post(3, -1.0), post(4, 2.0)]
            .into_iter()
            .collect();
        let tree = ConversationTree::from_replies(1u64, [(2u64, 1u64), (3, 1), (4, 1)]).unwrap();

        let aggregator = SentimentAggregator::new(&store, numeric());
        let average = aggregator.average_sentiment(&[tree]).unwrap();
        // deltas 2, -2, 1
        assert!((average - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_pooled_not_per_tree() {
        let store: InMemoryStore = vec![
            post(1, 0.0),
            post(2, 10.0),
            post(10, 0.0),
            post(11, 0.0),
            post(12, 0.0),
            post(13, 0.0),
        ]
        .into_iter()
        .collect();
        let a = ConversationTree::from_replies(1u64, [(2u64, 1u64)]).unwrap();
        let b = ConversationTree::from_replies(10u64, [(11u64, 10u64), (12, 10), (13, 10)]).unwrap();

        let aggregator = SentimentAggregator::new(&store, numeric());
        assert_eq!(aggregator.average_sentiment(&[a, b]).unwrap(), 2.5);
    }

    #[test]
    fn test_internal_nodes_skipped() {
        let store: InMemoryStore = vec![post(1, 0.0), post(2, 100.0), post(3, 5.0)]
            .into_iter()
            .collect();
        let tree = ConversationTree::from_replies(1u64, [(2u64, 1u64), (3, 2)]).unwrap();

        let aggregator = SentimentAggregator::new(&store, numeric());
        assert_eq!(aggregator.average_sentiment(&[tree]).unwrap(), 5.0);
    }

    #[test]
    fn test_empty_input_is_division_by_zero() {
        let store = InMemoryStore::new();
        let aggregator = SentimentAggregator::new(&store, numeric());
        let trees: [ConversationTree; 0] = [];
        let err = aggregator.average_sentiment(&trees).unwrap_err();
        assert!(matches!(err, EngineError::Core(CoreError::DivisionByZero)));
    }

    #[test]
    fn test_root_only_trees_are_division_by_zero() {
        let store: InMemoryStore = vec![post(1, 0.5)].into_iter().collect();
        let aggregator = SentimentAggregator::new(&store, numeric());
        let err = aggregator
            .average_sentiment(&[ConversationTree::new(1u64)])
            .unwrap_err();
        assert!(err.is_empty_pool());
    }

    #[test]
    fn test_missing_leaf_record() {
        let store: InMemoryStore = vec![post(1, 0.0)].into_iter().collect();
        let tree = ConversationTree::from_replies(1u64, [(2u64, 1u64)]).unwrap();
        let aggregator = SentimentAggregator::new(&store, numeric());
        assert!(matches!(
            aggregator.average_sentiment(&[tree]),
            Err(EngineError::MissingRecord { id: PostId(2) })
        ));
    }

    #[test]
    fn test_accepts_tree_references() {
        let store: InMemoryStore = vec![post(1, 0.0), post(2, 1.0)].into_iter().collect();
        let tree = ConversationTree::from_replies(1u64, [(2u64, 1u64)]).unwrap();
        let refs = vec![&tree, &tree];
        let aggregator = SentimentAggregator::new(&store, numeric());
        let pool = aggregator.accumulate(&refs).unwrap();
        assert_eq!(pool.count(), 2);
        assert_eq!(pool.sum(), 2.0);
    }

    #[test]
    fn test_collect_deltas() {
        let store: InMemoryStore = vec![post(1, 1.0), post(2, 0.0), post(3, 2.0)]
            .into_iter()
            .collect();
        let tree = ConversationTree::from_replies(1u64, [(2u64, 1u64), (3, 1)]).unwrap();
        let aggregator = SentimentAggregator::new(&store, numeric());
        let samples = aggregator.collect_deltas(&[tree]).unwrap();
        assert_eq!(samples.deltas, vec![-1.0, 1.0]);
        assert_eq!(samples.root_scores, vec![1.0]);
    }

    #[test]
    fn test_progress_every_interval() {
        let mut posts = Vec::new();
        let mut trees = Vec::new();
        for i in 0..5u64 {
            let root = i * 10;
            posts.push(post(root, 0.0));
            posts.push(post(root + 1, 1.0));
            trees.push(ConversationTree::from_replies(root, [(root + 1, root)]).unwrap());
        }
        let store: InMemoryStore = posts.into_iter().collect();
        let observer = RecordingObserver::default();

        let aggregator = SentimentAggregator::new(&store, numeric())
            .with_observer(&observer)
            .with_progress_interval(2);
        assert_eq!(aggregator.average_sentiment(&trees).unwrap(), 1.0);

        let snapshots = observer.snapshots.borrow();
        let processed: Vec<usize> = snapshots.iter().map(|s| s.trees_processed).collect();
        assert_eq!(processed, vec![2, 4]);
        assert_eq!(snapshots[1].contributions, 4);
        assert_eq!(snapshots[1].running_average, Some(1.0));

        let summaries = observer.summaries.borrow();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].leaves, 5);
    }
}
