//! Configuration module
//!
//! The CLI configuration file wraps the engine's [`AnalysisConfig`] in an
//! `[analysis]` table and adds scoring and output settings. Every section is
//! optional.

use crate::error::CliError;
use crate::output::OutputFormat;
use anyhow::{Context, Result};
use replydrift_engine::AnalysisConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct CliConfig {
    /// Analysis configuration
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Scoring configuration
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Scoring-related configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct ScoringConfig {
    /// Lexicon file replacing the embedded English lexicon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lexicon: Option<PathBuf>,
}

/// Output-related configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Format used when `--format` is not given
    pub default_format: OutputFormat,

    /// Pretty print JSON output
    pub pretty_json: bool,

    /// Decimal places for averages in text and markdown output
    pub precision: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: OutputFormat::Text,
            pretty_json: true,
            precision: 4,
        }
    }
}

impl CliConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| CliError::ConfigError(format!("failed to parse TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(CliError::FileNotFound(path.display().to_string()).into());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Load `path` when given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to render configuration")
    }

    /// Check every section
    pub fn validate(&self) -> Result<()> {
        self.analysis.validate()?;
        if self.output.precision > 12 {
            return Err(CliError::ConfigError(format!(
                "output precision must be at most 12, got {}",
                self.output.precision
            ))
            .into());
        }
        Ok(())
    }
}
