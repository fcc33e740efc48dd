//! Command-line entry point for replydrift

use clap::Parser;
use replydrift_cli::commands::Commands;

/// Sentiment drift between conversation roots and their replies
#[derive(Debug, Parser)]
#[command(name = "replydrift", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.command.execute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_buckets_command() {
        let cli = Cli::try_parse_from([
            "replydrift",
            "buckets",
            "-i",
            "tweets.jsonl",
            "--by",
            "day-of-year",
            "--measure",
            "posts",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Buckets(_)));
    }

    #[test]
    fn test_input_is_required() {
        assert!(Cli::try_parse_from(["replydrift", "sentiment"]).is_err());
    }
}
