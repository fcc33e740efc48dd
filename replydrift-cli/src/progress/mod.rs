//! Progress reporting module

use indicatif::{ProgressBar, ProgressStyle};
use replydrift_engine::{AggregateSummary, ProgressObserver, ProgressSnapshot, Stage};
use std::time::Duration;

const BAR_TEMPLATE: &str = "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {prefix} {msg}";

/// Progress reporter for dataset loading and tree traversal
///
/// Cloning shares the underlying bar, so one clone can be handed to the
/// analyzer while the command keeps another to finish the bar.
#[derive(Clone)]
pub struct ProgressReporter {
    progress_bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a new progress reporter; a quiet reporter draws nothing
    pub fn new(quiet: bool) -> Self {
        let progress_bar = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(0);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template(BAR_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("##-"),
            );
            pb
        };
        Self { progress_bar }
    }

    fn restart(&self, total: u64, prefix: &'static str) {
        self.progress_bar.reset();
        self.progress_bar.set_length(total);
        self.progress_bar.set_prefix(prefix);
        self.progress_bar.set_message("");
    }

    /// Initialize progress bar for dataset files
    pub fn init_files(&self, total_files: u64) {
        self.restart(total_files, "files");
        self.progress_bar
            .enable_steady_tick(Duration::from_millis(100));
    }

    /// Update progress for a loaded file
    pub fn file_completed(&self, filename: &str, posts: usize) {
        self.progress_bar
            .set_message(format!("Loaded {posts} posts from {filename}"));
        self.progress_bar.inc(1);
    }

    /// Finish progress reporting
    pub fn finish(&self) {
        self.progress_bar.disable_steady_tick();
        self.progress_bar.finish_and_clear();
    }
}

impl ProgressObserver for ProgressReporter {
    fn on_start(&self, stage: Stage, total_trees: usize) {
        let prefix = match stage {
            Stage::Sentiment => "trees",
            Stage::Counting => "trees counted",
        };
        self.restart(total_trees as u64, prefix);
    }

    fn on_progress(&self, snapshot: &ProgressSnapshot) {
        self.progress_bar
            .set_position(snapshot.trees_processed as u64);
        let message = match snapshot.running_average {
            Some(average) => format!("{} leaves, average {average:+.4}", snapshot.contributions),
            None => format!("{} posts", snapshot.contributions),
        };
        self.progress_bar.set_message(message);
    }

    fn on_complete(&self, summary: &AggregateSummary) {
        self.progress_bar.set_position(summary.trees as u64);
        log::debug!(
            "Pass finished: {} trees, {} leaves",
            summary.trees,
            summary.leaves
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_reporter_accepts_updates() {
        let reporter = ProgressReporter::new(true);
        reporter.init_files(2);
        reporter.file_completed("a.jsonl", 10);
        reporter.on_start(Stage::Sentiment, 5);
        reporter.on_progress(&ProgressSnapshot {
            stage: Stage::Sentiment,
            trees_processed: 2,
            total_trees: 5,
            contributions: 7,
            running_average: Some(0.25),
        });
        reporter.finish();
    }

    #[test]
    fn test_clones_share_the_bar() {
        let reporter = ProgressReporter::new(true);
        let clone = reporter.clone();
        clone.on_start(Stage::Counting, 10);
        clone.on_progress(&ProgressSnapshot {
            stage: Stage::Counting,
            trees_processed: 4,
            total_trees: 10,
            contributions: 12,
            running_average: None,
        });
        assert_eq!(reporter.progress_bar.position(), 4);
        assert_eq!(reporter.progress_bar.length(), Some(10));
    }
}
