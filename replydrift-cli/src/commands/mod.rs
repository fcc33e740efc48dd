//! CLI command implementations

use crate::config::CliConfig;
use crate::output::OutputFormat;
use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;

pub mod buckets;
pub mod common;
pub mod generate_config;
pub mod lengths;
pub mod sentiment;
pub mod topics;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Pooled leaf-versus-root sentiment per account
    Sentiment(sentiment::SentimentArgs),

    /// Mean conversation length per account
    Lengths(lengths::LengthsArgs),

    /// Sentiment or post counts bucketed by weekday, hour or day of year
    Buckets(buckets::BucketsArgs),

    /// Sentiment of conversations matching topic keywords
    Topics(topics::TopicsArgs),

    /// Write a configuration template
    GenerateConfig(generate_config::GenerateConfigArgs),

    /// Check a configuration file
    Validate(validate::ValidateArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },
}

/// List subcommands
#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// List configured accounts
    Accounts(ListArgs),

    /// List configured topics and their keywords
    Topics(ListArgs),

    /// List available output formats
    Formats,
}

/// Arguments of the list subcommands that read a configuration
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Configuration file (default: built-in defaults)
    #[arg(short, long, value_name = "FILE", env = "REPLYDRIFT_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Commands {
    /// Run the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Sentiment(args) => args.execute(),
            Commands::Lengths(args) => args.execute(),
            Commands::Buckets(args) => args.execute(),
            Commands::Topics(args) => args.execute(),
            Commands::GenerateConfig(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
            Commands::List { subcommand } => subcommand.execute(),
        }
    }
}

impl ListCommands {
    /// Print the requested listing
    pub fn execute(&self) -> Result<()> {
        match self {
            ListCommands::Accounts(args) => {
                let config = CliConfig::load(args.config.as_deref())?;
                println!("Configured accounts:");
                for account in &config.analysis.accounts {
                    println!("  {:>12}  {}", account.id, account.name);
                }
            }
            ListCommands::Topics(args) => {
                let config = CliConfig::load(args.config.as_deref())?;
                println!("Configured topics:");
                for (name, keywords) in &config.analysis.topics {
                    println!("  {:<10} {}", name, keywords.join(", "));
                }
            }
            ListCommands::Formats => {
                println!("Available output formats:");
                for (name, description) in OutputFormat::describe_all() {
                    println!("  {name:<10} - {description}");
                }
            }
        }
        Ok(())
    }
}
