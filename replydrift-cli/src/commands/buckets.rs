//! Buckets command implementation

use super::common::AnalysisArgs;
use crate::output::BucketTable;
use anyhow::{Context, Result};
use clap::Args;
use replydrift_engine::{Account, Analyzer, BucketKey, DayOfYear, HourOfDay, RootFilter, Weekday};

/// Arguments for the buckets command
#[derive(Debug, Args)]
pub struct BucketsArgs {
    #[command(flatten)]
    pub common: AnalysisArgs,

    /// Calendar grouping of the conversation roots
    #[arg(long, value_enum)]
    pub by: Grouping,

    /// What each bucket reports
    #[arg(long, value_enum, default_value = "sentiment")]
    pub measure: Measure,
}

/// Supported calendar groupings
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Grouping {
    /// Weekday of the root post
    Weekday,
    /// Hour of the root post, shifted by the configured hour shift
    Hour,
    /// Ordinal day of the year of the root post
    DayOfYear,
}

/// Bucket contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Measure {
    /// Pooled leaf-versus-root sentiment
    Sentiment,
    /// Number of posts, roots included
    Posts,
}

impl BucketsArgs {
    /// Execute the buckets command
    pub fn execute(&self) -> Result<()> {
        let session = self.common.open_session()?;
        let accounts = session.analyzer.accounts(&self.common.accounts)?;

        let mut tables = Vec::with_capacity(accounts.len());
        for account in accounts {
            let table = match self.by {
                Grouping::Weekday => self.table::<Weekday>(&session.analyzer, account, session.filter),
                Grouping::Hour => self.table::<HourOfDay>(&session.analyzer, account, session.filter),
                Grouping::DayOfYear => {
                    self.table::<DayOfYear>(&session.analyzer, account, session.filter)
                }
            }?;
            tables.push(table);
        }
        session.finish();

        let mut formatter = self.common.formatter(&session.config)?;
        for table in &tables {
            formatter.buckets(table)?;
        }
        formatter.finish()
    }

    fn table<K: BucketKey>(
        &self,
        analyzer: &Analyzer,
        account: Account,
        filter: RootFilter,
    ) -> Result<BucketTable> {
        let context = || format!("Failed to bucket conversations of {}", account.name);
        match self.measure {
            Measure::Sentiment => {
                let report = analyzer
                    .sentiment_by::<K>(account.id, filter)
                    .with_context(context)?;
                Ok(BucketTable::from_sentiment(account, &report))
            }
            Measure::Posts => {
                let counts = analyzer
                    .activity_by::<K>(account.id, filter)
                    .with_context(context)?;
                Ok(BucketTable::from_counts(account, &counts))
            }
        }
    }
}
