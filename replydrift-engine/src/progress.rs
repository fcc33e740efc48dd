//! Progress reporting hooks
//!
//! Long aggregation runs report their state periodically. Reporting is a
//! side channel only: observers cannot influence results.

/// Which kind of pass is reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Leaf-versus-root sentiment aggregation
    Sentiment,
    /// Post counting by day of year
    Counting,
}

/// Intermediate state of a running pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    /// Kind of pass
    pub stage: Stage,
    /// Trees processed so far
    pub trees_processed: usize,
    /// Trees in the pass
    pub total_trees: usize,
    /// Leaves (sentiment) or posts (counting) seen so far
    pub contributions: u64,
    /// Pooled mean so far, `None` before the first leaf
    pub running_average: Option<f64>,
}

/// Final state of a sentiment pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateSummary {
    /// Trees processed
    pub trees: usize,
    /// Leaves compared against their root
    pub leaves: u64,
    /// Sum of all deltas
    pub sum: f64,
    /// Pooled mean, `None` when no leaf contributed
    pub average: Option<f64>,
}

/// Receives progress of aggregation passes
pub trait ProgressObserver {
    /// A pass over `total_trees` trees starts
    fn on_start(&self, _stage: Stage, _total_trees: usize) {}

    /// Periodic report
    fn on_progress(&self, snapshot: &ProgressSnapshot);

    /// A sentiment pass finished
    fn on_complete(&self, _summary: &AggregateSummary) {}
}

/// Observer that ignores every report
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&self, _snapshot: &ProgressSnapshot) {}
}

/// Observer that writes reports through the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn on_progress(&self, snapshot: &ProgressSnapshot) {
        match (snapshot.stage, snapshot.running_average) {
            (Stage::Sentiment, Some(average)) => log::info!(
                "Trees: {}/{} leaves: {} average: {average:.4}",
                snapshot.trees_processed,
                snapshot.total_trees,
                snapshot.contributions
            ),
            (Stage::Sentiment, None) => log::info!(
                "Trees: {}/{} leaves: 0",
                snapshot.trees_processed,
                snapshot.total_trees
            ),
            (Stage::Counting, _) => log::info!(
                "Trees: {}/{} posts counted: {}",
                snapshot.trees_processed,
                snapshot.total_trees,
                snapshot.contributions
            ),
        }
    }

    fn on_complete(&self, summary: &AggregateSummary) {
        match summary.average {
            Some(average) => log::info!(
                "Total delta {:.4} over {} leaves in {} trees, average {average:.4}",
                summary.sum,
                summary.leaves,
                summary.trees
            ),
            None => log::warn!("No leaf replies in {} trees", summary.trees),
        }
    }
}
