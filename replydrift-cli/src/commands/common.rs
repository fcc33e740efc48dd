//! Arguments and setup shared by the analysis commands

use crate::config::CliConfig;
use crate::input::{load_datasets, resolve_patterns};
use crate::output::{create_formatter, OutputFormat, ReportFormatter};
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use replydrift_engine::{Analyzer, EmptyBucketPolicy, LexiconScorer, ReplyIndex, RootFilter};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Conversation root selection on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FilterArg {
    /// Every conversation the account took part in
    Both,
    /// Only conversations started by someone else
    NoAirline,
    /// Only conversations started by the account
    AirlineOnly,
}

impl From<FilterArg> for RootFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::Both => RootFilter::Both,
            FilterArg::NoAirline => RootFilter::NoAirline,
            FilterArg::AirlineOnly => RootFilter::AirlineOnly,
        }
    }
}

/// Arguments shared by every analysis command
#[derive(Debug, Args)]
pub struct AnalysisArgs {
    /// Dataset files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Account ids to report on (default: every configured account)
    #[arg(short, long = "account", value_name = "ID")]
    pub accounts: Vec<u64>,

    /// Which conversation roots to include (default: from configuration)
    #[arg(long, value_enum)]
    pub filter: Option<FilterArg>,

    /// Report empty buckets as absent instead of failing
    #[arg(long)]
    pub skip_empty: bool,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (default: from configuration)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE", env = "REPLYDRIFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Lexicon file replacing the embedded English lexicon
    #[arg(long, value_name = "FILE")]
    pub lexicon: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Everything an analysis command needs once the dataset is loaded
pub struct Session {
    /// The analyzer over the loaded dataset
    pub analyzer: Analyzer,
    /// Effective configuration, command line overrides applied
    pub config: CliConfig,
    /// Effective root filter
    pub filter: RootFilter,
    reporter: ProgressReporter,
}

impl Session {
    /// Stop drawing progress
    pub fn finish(&self) {
        self.reporter.finish();
    }
}

impl AnalysisArgs {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            let init = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(log_level),
            )
            .try_init();
            if init.is_err() {
                log::debug!("Logger already initialized, keeping existing filter");
            }
        }
    }

    /// Configuration file merged with command line overrides
    pub fn effective_config(&self) -> Result<CliConfig> {
        let mut config = CliConfig::load(self.config.as_deref())?;
        if self.skip_empty {
            config.analysis.empty_buckets = EmptyBucketPolicy::Skip;
        }
        if let Some(filter) = self.filter {
            config.analysis.root_filter = filter.into();
        }
        if let Some(lexicon) = &self.lexicon {
            config.scoring.lexicon = Some(lexicon.clone());
        }
        Ok(config)
    }

    /// Load the dataset and build the analyzer
    pub fn open_session(&self) -> Result<Session> {
        self.open_session_with(self.effective_config()?)
    }

    /// Load the dataset and build the analyzer with a prepared configuration
    pub fn open_session_with(&self, config: CliConfig) -> Result<Session> {
        self.init_logging();
        log::debug!("Arguments: {:?}", self);

        let files = resolve_patterns(&self.input)?;
        let reporter = ProgressReporter::new(self.quiet);
        let (store, _) = load_datasets(&files, &reporter)?;
        let index = ReplyIndex::build(&store)?;

        let builder = Analyzer::builder()
            .config(config.analysis.clone())
            .store(store)
            .source(index)
            .observer(reporter.clone());
        let builder = match &config.scoring.lexicon {
            Some(path) => {
                let scorer = LexiconScorer::from_file(path)
                    .with_context(|| format!("Failed to load lexicon {}", path.display()))?;
                log::info!("Using lexicon '{}' ({} words)", scorer.name(), scorer.word_count());
                builder.scorer(scorer)
            }
            None => builder.scorer(LexiconScorer::english()?),
        };

        Ok(Session {
            analyzer: builder.build()?,
            filter: config.analysis.root_filter,
            config,
            reporter,
        })
    }

    /// Formatter writing to the requested output
    pub fn formatter(&self, config: &CliConfig) -> Result<Box<dyn ReportFormatter>> {
        let format = self.format.unwrap_or(config.output.default_format);
        let writer: Box<dyn Write + Send + Sync> = match &self.output {
            Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
                format!("Failed to create output file {}", path.display())
            })?)),
            None => Box::new(io::stdout()),
        };
        Ok(create_formatter(
            format,
            writer,
            config.output.pretty_json,
            config.output.precision,
        ))
    }
}
