//! Sentiment command implementation

use super::common::AnalysisArgs;
use anyhow::Result;
use clap::Args;

/// Arguments for the sentiment command
#[derive(Debug, Args)]
pub struct SentimentArgs {
    #[command(flatten)]
    pub common: AnalysisArgs,
}

impl SentimentArgs {
    /// Execute the sentiment command
    pub fn execute(&self) -> Result<()> {
        let session = self.common.open_session()?;
        log::info!("Computing pooled sentiment drift ({})", session.filter);

        let report = session
            .analyzer
            .sentiment_by_account(&self.common.accounts, session.filter)?;
        session.finish();

        let mut formatter = self.common.formatter(&session.config)?;
        formatter.account_sentiment(&report)?;
        formatter.finish()
    }
}
