//! Analysis facade and builder
//!
//! [`Analyzer`] ties a document store, a conversation source, a scorer and an
//! [`AnalysisConfig`] together and exposes one method per report.

use crate::aggregator::SentimentAggregator;
use crate::bucketing::{bucket_sentiment, count_posts, BucketReport, Buckets};
use crate::config::{Account, AnalysisConfig, EmptyBucketPolicy};
use crate::conversation::{ConversationSource, ReplyIndex, RootFilter};
use crate::error::{EngineError, Result};
use crate::progress::{NoProgress, ProgressObserver};
use crate::sentiment::{LexiconScorer, SentimentScorer};
use crate::store::{DocumentStore, InMemoryStore};
use crate::topics::{topic_report, TopicMatcher, TopicReport};
use replydrift_core::{
    BucketKey, ConversationTree, DayOfYear, DeltaAccumulator, HourOfDay, Weekday,
};
use serde::Serialize;

/// Pooled sentiment drift of one account
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSentiment {
    /// The account
    pub account: Account,
    /// Conversations the account took part in
    pub trees: usize,
    /// Leaves that contributed a delta
    pub leaves: u64,
    /// Pooled mean delta; `None` when skipped as empty
    pub average: Option<f64>,
}

/// Mean conversation length of one account
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountLength {
    /// The account
    pub account: Account,
    /// Conversations the account took part in
    pub trees: usize,
    /// Posts across those conversations, roots included
    pub posts: usize,
    /// Mean posts per conversation; `None` when skipped as empty
    pub mean_length: Option<f64>,
}

/// Reply drift analysis over one dataset
pub struct Analyzer {
    config: AnalysisConfig,
    store: Box<dyn DocumentStore>,
    source: Box<dyn ConversationSource>,
    scorer: Box<dyn SentimentScorer>,
    observer: Box<dyn ProgressObserver>,
}

impl Analyzer {
    /// Start building an analyzer
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Analyzer over a loaded store, indexing its reply links
    ///
    /// Uses the embedded English lexicon and no progress reporting.
    pub fn from_store(config: AnalysisConfig, store: InMemoryStore) -> Result<Self> {
        let index = ReplyIndex::build(&store)?;
        Self::builder()
            .config(config)
            .store(store)
            .source(index)
            .build()
    }

    /// The active configuration
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    fn aggregator(&self) -> SentimentAggregator<'_, &dyn DocumentStore, &dyn SentimentScorer> {
        SentimentAggregator::new(self.store.as_ref(), self.scorer.as_ref())
            .with_observer(self.observer.as_ref())
            .with_progress_interval(self.config.progress_interval)
    }

    /// Configured accounts matching `ids`, or all of them when `ids` is empty
    pub fn accounts(&self, ids: &[u64]) -> Result<Vec<Account>> {
        if ids.is_empty() {
            return Ok(self.config.accounts.clone());
        }
        ids.iter()
            .map(|&id| self.config.account(id).cloned())
            .collect()
    }

    /// Conversations a configured account took part in
    pub fn trees(&self, account_id: u64, filter: RootFilter) -> Result<Vec<ConversationTree>> {
        let account = self.config.account(account_id)?;
        let trees = self.source.import_trees(account.id, filter)?;
        log::info!("{}: {} conversations ({filter})", account.name, trees.len());
        Ok(trees)
    }

    /// Pooled leaf-versus-root sentiment per account
    pub fn sentiment_by_account(
        &self,
        account_ids: &[u64],
        filter: RootFilter,
    ) -> Result<Vec<AccountSentiment>> {
        let aggregator = self.aggregator();
        let mut report = Vec::new();

        for account in self.accounts(account_ids)? {
            let trees = self.trees(account.id, filter)?;
            let pool = aggregator.accumulate(&trees)?;
            let average = self.apply_policy(pool.mean().map_err(EngineError::from), &account)?;
            report.push(AccountSentiment {
                trees: trees.len(),
                leaves: pool.count(),
                average,
                account,
            });
        }

        Ok(report)
    }

    /// Mean number of posts per conversation, per account
    pub fn conversation_length_by_account(
        &self,
        account_ids: &[u64],
        filter: RootFilter,
    ) -> Result<Vec<AccountLength>> {
        let mut report = Vec::new();

        for account in self.accounts(account_ids)? {
            let trees = self.trees(account.id, filter)?;
            let lengths: DeltaAccumulator =
                trees.iter().map(|tree| tree.post_count() as f64).collect();
            let mean_length =
                self.apply_policy(lengths.mean().map_err(EngineError::from), &account)?;
            report.push(AccountLength {
                trees: trees.len(),
                posts: trees.iter().map(ConversationTree::post_count).sum(),
                mean_length,
                account,
            });
        }

        Ok(report)
    }

    fn apply_policy(&self, mean: Result<f64>, account: &Account) -> Result<Option<f64>> {
        match mean {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_empty_pool() => match self.config.empty_buckets {
                EmptyBucketPolicy::Fail => Err(err.for_bucket(&account.name)),
                EmptyBucketPolicy::Skip => {
                    log::warn!("Skipping {}: nothing to aggregate", account.name);
                    Ok(None)
                }
            },
            Err(err) => Err(err),
        }
    }

    /// Pooled sentiment of an account's conversations per calendar bucket
    pub fn sentiment_by<K: BucketKey>(
        &self,
        account_id: u64,
        filter: RootFilter,
    ) -> Result<BucketReport<K>> {
        let trees = self.trees(account_id, filter)?;
        bucket_sentiment(
            &self.aggregator(),
            &trees,
            &self.config.time,
            self.config.empty_buckets,
        )
    }

    /// Pooled sentiment per weekday of the root post
    pub fn sentiment_by_weekday(
        &self,
        account_id: u64,
        filter: RootFilter,
    ) -> Result<BucketReport<Weekday>> {
        self.sentiment_by(account_id, filter)
    }

    /// Pooled sentiment per shifted hour of the root post
    pub fn sentiment_by_hour(
        &self,
        account_id: u64,
        filter: RootFilter,
    ) -> Result<BucketReport<HourOfDay>> {
        self.sentiment_by(account_id, filter)
    }

    /// Posts per calendar bucket across an account's conversations
    pub fn activity_by<K: BucketKey>(
        &self,
        account_id: u64,
        filter: RootFilter,
    ) -> Result<Buckets<K, u64>> {
        let trees = self.trees(account_id, filter)?;
        count_posts(
            self.store.as_ref(),
            &trees,
            &self.config.time,
            self.observer.as_ref(),
            self.config.progress_interval,
        )
    }

    /// Posts per day of the year across an account's conversations
    pub fn activity_by_day_of_year(
        &self,
        account_id: u64,
        filter: RootFilter,
    ) -> Result<Buckets<DayOfYear, u64>> {
        self.activity_by(account_id, filter)
    }

    /// Sentiment drift of an account's conversations about a configured topic
    pub fn topic_sentiment(
        &self,
        account_id: u64,
        topic: &str,
        filter: RootFilter,
    ) -> Result<TopicReport> {
        let (name, keywords) = self.config.topic_entry(topic)?;
        let trees = self.trees(account_id, filter)?;
        self.report_topic(name, &TopicMatcher::new(keywords), &trees)
    }

    /// One report per configured topic, sharing a single tree import
    pub fn topic_sentiments(
        &self,
        account_id: u64,
        topics: &[String],
        filter: RootFilter,
    ) -> Result<Vec<TopicReport>> {
        let names: Vec<&str> = if topics.is_empty() {
            self.config.topics.keys().map(String::as_str).collect()
        } else {
            topics.iter().map(String::as_str).collect()
        };

        let trees = self.trees(account_id, filter)?;
        names
            .into_iter()
            .map(|name| {
                let (name, keywords) = self.config.topic_entry(name)?;
                self.report_topic(name, &TopicMatcher::new(keywords), &trees)
            })
            .collect()
    }

    fn report_topic(
        &self,
        topic: &str,
        matcher: &TopicMatcher,
        trees: &[ConversationTree],
    ) -> Result<TopicReport> {
        topic_report(
            &self.aggregator(),
            topic,
            matcher,
            trees,
            self.config.histogram_bins,
            self.config.include_samples,
        )
    }
}

/// Builder for [`Analyzer`]
///
/// A store and a conversation source are required. Without a scorer the
/// embedded English lexicon is used; without an observer progress is not
/// reported.
#[derive(Default)]
pub struct AnalyzerBuilder {
    config: Option<AnalysisConfig>,
    store: Option<Box<dyn DocumentStore>>,
    source: Option<Box<dyn ConversationSource>>,
    scorer: Option<Box<dyn SentimentScorer>>,
    observer: Option<Box<dyn ProgressObserver>>,
}

impl AnalyzerBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the analysis configuration
    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the document store
    pub fn store<S: DocumentStore + 'static>(mut self, store: S) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Set the conversation source
    pub fn source<C: ConversationSource + 'static>(mut self, source: C) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Set the sentiment scorer
    pub fn scorer<C: SentimentScorer + 'static>(mut self, scorer: C) -> Self {
        self.scorer = Some(Box::new(scorer));
        self
    }

    /// Set the progress observer
    pub fn observer<O: ProgressObserver + 'static>(mut self, observer: O) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Validate the configuration and build the analyzer
    pub fn build(self) -> Result<Analyzer> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let store = self
            .store
            .ok_or_else(|| EngineError::ConfigError("a document store is required".into()))?;
        let source = self
            .source
            .ok_or_else(|| EngineError::ConfigError("a conversation source is required".into()))?;
        let scorer: Box<dyn SentimentScorer> = match self.scorer {
            Some(scorer) => scorer,
            None => Box::new(LexiconScorer::english()?),
        };
        let observer: Box<dyn ProgressObserver> = match self.observer {
            Some(observer) => observer,
            None => Box::new(NoProgress),
        };

        Ok(Analyzer {
            config,
            store,
            source,
            scorer,
            observer,
        })
    }
}
