//! Topics command implementation

use super::common::AnalysisArgs;
use crate::output::TopicTable;
use anyhow::Result;
use clap::Args;

/// Arguments for the topics command
#[derive(Debug, Args)]
pub struct TopicsArgs {
    #[command(flatten)]
    pub common: AnalysisArgs,

    /// Topics to report (default: every configured topic)
    #[arg(short, long = "topic", value_name = "NAME")]
    pub topics: Vec<String>,

    /// Include the raw deltas and root scores (JSON output)
    #[arg(long)]
    pub samples: bool,

    /// Histogram bins (default: from configuration)
    #[arg(long, value_name = "N")]
    pub bins: Option<usize>,
}

impl TopicsArgs {
    /// Execute the topics command
    pub fn execute(&self) -> Result<()> {
        let mut common_config = self.common.effective_config()?;
        if self.samples {
            common_config.analysis.include_samples = true;
        }
        if let Some(bins) = self.bins {
            common_config.analysis.histogram_bins = bins;
        }
        common_config.validate()?;

        let session = self.common.open_session_with(common_config)?;
        let accounts = session.analyzer.accounts(&self.common.accounts)?;

        let mut tables = Vec::with_capacity(accounts.len());
        for account in accounts {
            let topics = session
                .analyzer
                .topic_sentiments(account.id, &self.topics, session.filter)?;
            tables.push(TopicTable { account, topics });
        }
        session.finish();

        let mut formatter = self.common.formatter(&session.config)?;
        for table in &tables {
            formatter.topics(table)?;
        }
        formatter.finish()
    }
}
