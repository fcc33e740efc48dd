//! Topic selection and per-topic sentiment reports

use crate::aggregator::SentimentAggregator;
use crate::error::Result;
use crate::sentiment::SentimentScorer;
use crate::store::DocumentStore;
use replydrift_core::{ConversationTree, DeltaSamples, Histogram};
use serde::Serialize;
use std::borrow::Borrow;

/// Case-insensitive keyword matcher for root post text
///
/// A keyword matches anywhere inside the text, so a stem like `spac` matches
/// both `space` and `spacious`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMatcher {
    keywords: Vec<String>,
}

impl TopicMatcher {
    /// Matcher for `keywords`; blank keywords are dropped
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Normalized keywords
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Whether any keyword occurs in `text`
    pub fn matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.keywords.iter().any(|keyword| text.contains(keyword.as_str()))
    }

    /// Trees whose root post matches
    pub fn select<'t, S, T>(&self, store: &S, trees: &'t [T]) -> Result<Vec<&'t ConversationTree>>
    where
        S: DocumentStore + ?Sized,
        T: Borrow<ConversationTree>,
    {
        let mut selected = Vec::new();
        for tree in trees {
            let tree: &'t ConversationTree = tree.borrow();
            let root = store.fetch(tree.root().id())?;
            if self.matches(&root.text) {
                selected.push(tree);
            }
        }
        Ok(selected)
    }
}

/// Sentiment drift within one topic
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicReport {
    /// Topic name
    pub topic: String,
    /// Keywords the topic was matched with
    pub keywords: Vec<String>,
    /// Conversations whose root matched
    pub tree_count: usize,
    /// Leaves that contributed a delta
    pub leaf_count: u64,
    /// Pooled mean of `leaf - root`; `None` when no leaf contributed
    pub mean_delta: Option<f64>,
    /// Mean root score; `None` when no tree matched
    pub mean_root: Option<f64>,
    /// Distribution of the deltas
    pub histogram: Histogram,
    /// Raw deltas and root scores, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub samples: Option<DeltaSamples>,
}

/// Build the report for trees matched by `matcher`
///
/// Unlike bucket averages, a topic without leaves is not an error: the
/// report simply carries no mean.
pub fn topic_report<S, C, T>(
    aggregator: &SentimentAggregator<'_, S, C>,
    topic: &str,
    matcher: &TopicMatcher,
    trees: &[T],
    bins: usize,
    include_samples: bool,
) -> Result<TopicReport>
where
    S: DocumentStore,
    C: SentimentScorer,
    T: Borrow<ConversationTree>,
{
    let selected = matcher.select(aggregator.store(), trees)?;
    log::debug!("Topic {topic}: {} of {} trees", selected.len(), trees.len());

    let samples = aggregator.collect_deltas(&selected)?;
    let histogram = Histogram::from_samples(&samples.deltas, bins)?;

    Ok(TopicReport {
        topic: topic.to_string(),
        keywords: matcher.keywords().to_vec(),
        tree_count: selected.len(),
        leaf_count: samples.deltas.len() as u64,
        mean_delta: samples.mean_delta().ok(),
        mean_root: samples.mean_root().ok(),
        histogram,
        samples: include_samples.then_some(samples),
    })
}
