//! Generate config command implementation

use crate::config::CliConfig;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        use std::fs;

        println!("Generating configuration template...");
        println!("  Output file: {}", self.output.display());

        let template = self.generate_template()?;

        fs::write(&self.output, template)
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Configuration template generated successfully!");
        println!();
        println!("Next steps:");
        println!("1. Edit the accounts, topics and time settings");
        println!("2. Validate your configuration:");
        println!("   replydrift validate -c {}", self.output.display());
        println!("3. Use it for analysis:");
        println!(
            "   replydrift sentiment -i 'data/*.jsonl' -c {}",
            self.output.display()
        );

        Ok(())
    }

    /// Template content: the defaults with a commented header
    fn generate_template(&self) -> Result<String> {
        let body = CliConfig::default().to_toml_string()?;
        Ok(format!(
            r#"# replydrift configuration
#
# [analysis]
#   root_filter     both | no-airline | airline-only
#   empty_buckets   fail | skip
#   [analysis.time] utc_offset_minutes, hour_shift (0-23), leap_day = fold | reject
#   [[analysis.accounts]] id and display name of every tracked account
#   [analysis.topics] topic name -> keywords matched against the root text
#
# [scoring]
#   lexicon         optional path to a lexicon TOML file
#
# [output]
#   default_format  text | json | markdown

{body}"#
        ))
    }
}
