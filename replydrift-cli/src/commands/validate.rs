//! Validate command implementation

use crate::config::CliConfig;
use anyhow::Result;
use clap::Args;
use replydrift_engine::LexiconScorer;
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the configuration file to validate
    #[arg(short = 'c', long, value_name = "FILE", required = true)]
    pub config: PathBuf,

    /// Lexicon file to validate alongside (default: from configuration)
    #[arg(long, value_name = "FILE")]
    pub lexicon: Option<PathBuf>,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        println!("Validating configuration: {}", self.config.display());

        match self.check() {
            Ok(summary) => {
                println!("✓ Configuration is valid!");
                for line in summary {
                    println!("  {line}");
                }
                Ok(())
            }
            Err(e) => {
                println!("✗ Configuration is invalid!");
                println!("  Error: {e:#}");
                Err(anyhow::anyhow!("Validation failed: {:#}", e))
            }
        }
    }

    fn check(&self) -> Result<Vec<String>> {
        let config = CliConfig::from_file(&self.config)?;
        let mut summary = vec![
            format!("Accounts: {}", config.analysis.accounts.len()),
            format!("Topics: {}", config.analysis.topics.len()),
            format!("Root filter: {}", config.analysis.root_filter),
        ];

        let lexicon = self.lexicon.as_ref().or(config.scoring.lexicon.as_ref());
        if let Some(path) = lexicon {
            let scorer = LexiconScorer::from_file(path)?;
            summary.push(format!(
                "Lexicon: {} ({} words)",
                scorer.name(),
                scorer.word_count()
            ));
        }
        Ok(summary)
    }
}
