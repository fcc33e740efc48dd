//! Lengths command implementation

use super::common::AnalysisArgs;
use anyhow::Result;
use clap::Args;

/// Arguments for the lengths command
#[derive(Debug, Args)]
pub struct LengthsArgs {
    #[command(flatten)]
    pub common: AnalysisArgs,
}

impl LengthsArgs {
    /// Execute the lengths command
    pub fn execute(&self) -> Result<()> {
        let session = self.common.open_session()?;

        let report = session
            .analyzer
            .conversation_length_by_account(&self.common.accounts, session.filter)?;
        session.finish();

        let mut formatter = self.common.formatter(&session.config)?;
        formatter.account_lengths(&report)?;
        formatter.finish()
    }
}
