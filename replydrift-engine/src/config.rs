//! Analysis configuration
//!
//! Everything the analysis functions need besides the store and the scorer:
//! the airline accounts to report on, topic keyword lists, time conversion,
//! and the policies for empty buckets and progress reporting. The struct is
//! passed explicitly into the [`Analyzer`](crate::Analyzer); there is no
//! global state.

use crate::conversation::RootFilter;
use crate::error::{EngineError, Result};
use replydrift_core::{LeapDayPolicy, TimeSettings, DEFAULT_HISTOGRAM_BINS};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Topic name to keyword list, in configuration order
pub type TopicMap = IndexMap<String, Vec<String>>;

/// Trees processed between two progress reports
pub const DEFAULT_PROGRESS_INTERVAL: usize = 1000;

/// An account whose conversations are analyzed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Numeric user id
    pub id: u64,
    /// Screen name, used in reports
    pub name: String,
}

impl Account {
    /// Create an account entry
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// What happens to a bucket that has nothing to aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyBucketPolicy {
    /// Abort the run with a division-by-zero error
    #[default]
    Fail,
    /// Leave the bucket out of the report
    Skip,
}

/// Analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Trees between two progress reports
    pub progress_interval: usize,
    /// Bins used for delta histograms
    pub histogram_bins: usize,
    /// Keep raw delta and root score lists in topic reports
    pub include_samples: bool,
    /// Which conversation roots to include
    pub root_filter: RootFilter,
    /// Handling of buckets without contributions
    pub empty_buckets: EmptyBucketPolicy,
    /// Timestamp conversion
    pub time: TimeSettings,
    /// Accounts to report on
    pub accounts: Vec<Account>,
    /// Topic name to keyword list
    pub topics: TopicMap,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            include_samples: false,
            root_filter: RootFilter::default(),
            empty_buckets: EmptyBucketPolicy::default(),
            time: TimeSettings::default(),
            accounts: default_accounts(),
            topics: default_topics(),
        }
    }
}

/// Airline accounts of the reference tweet dataset
pub fn default_accounts() -> Vec<Account> {
    vec![
        Account::new(56377143, "KLM"),
        Account::new(106062176, "AirFrance"),
        Account::new(18332190, "British_Airways"),
        Account::new(22536055, "AmericanAir"),
        Account::new(124476322, "lufthansa"),
        Account::new(26223583, "airberlin"),
        Account::new(2182373406, "airberlin assist"),
        Account::new(38676903, "easyJet"),
        Account::new(1542862735, "Ryanair"),
        Account::new(253340062, "SingaporeAir"),
        Account::new(218730857, "Qantas"),
        Account::new(45621423, "EtihadAirways"),
        Account::new(20626359, "VirginAtlantic"),
    ]
}

/// Airline complaint topics and their keywords
pub fn default_topics() -> TopicMap {
    let topics: [(&str, &[&str]); 5] = [
        (
            "Food",
            &["food", "drink", "meal", "eat", "beverage", "alcohol"],
        ),
        (
            "Luggage",
            &[
                "luggage",
                "bag",
                "suitcase",
                "backpack",
                "lost",
                "gear",
                "carry-on",
                "trunk",
                "conveyor belt",
                "damage",
                "missing",
                "belonging",
                "possession",
            ],
        ),
        (
            "Delay",
            &[
                "delay", "cancel", "wait", "postpone", "late", "slow", "abort", "suspen",
            ],
        ),
        ("Space", &["spac", "seat", "room", "leg", "chair"]),
        (
            "Service",
            &[
                "service",
                "assistance",
                "help",
                "steward",
                "air host",
                "cabin crew",
                "hostess",
                "captain",
                "pilot",
            ],
        ),
    ];

    topics
        .iter()
        .map(|(name, words)| {
            (
                name.to_string(),
                words.iter().map(|w| w.to_string()).collect(),
            )
        })
        .collect()
}

impl AnalysisConfig {
    /// Create a builder
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::new()
    }

    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| EngineError::ConfigError(format!("failed to parse TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            EngineError::IoError(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| EngineError::ConfigError(format!("failed to render TOML: {e}")))
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.progress_interval == 0 {
            return Err(EngineError::ConfigError(
                "progress interval must be greater than 0".to_string(),
            ));
        }

        if self.histogram_bins == 0 {
            return Err(EngineError::ConfigError(
                "histogram bins must be greater than 0".to_string(),
            ));
        }

        if self.time.hour_shift >= 24 {
            return Err(EngineError::ConfigError(format!(
                "hour shift must be below 24, got {}",
                self.time.hour_shift
            )));
        }

        // chrono accepts offsets strictly inside one day; real zones stay within 18h
        if self.time.utc_offset_minutes.abs() > 18 * 60 {
            return Err(EngineError::ConfigError(format!(
                "UTC offset must be within 18 hours, got {} minutes",
                self.time.utc_offset_minutes
            )));
        }

        let mut seen = HashSet::new();
        for account in &self.accounts {
            if !seen.insert(account.id) {
                return Err(EngineError::ConfigError(format!(
                    "account {} listed twice",
                    account.id
                )));
            }
        }

        for (name, keywords) in &self.topics {
            if keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(EngineError::ConfigError(format!(
                    "topic '{name}' has no keywords"
                )));
            }
        }

        Ok(())
    }

    /// Look up a configured account
    pub fn account(&self, id: u64) -> Result<&Account> {
        self.accounts
            .iter()
            .find(|a| a.id == id)
            .ok_or(EngineError::UnknownAccount { id })
    }

    /// Look up a topic's keywords, case-insensitively by name
    pub fn topic(&self, name: &str) -> Result<&[String]> {
        self.topic_entry(name).map(|(_, keywords)| keywords)
    }

    /// Configured spelling of a topic name together with its keywords
    pub fn topic_entry(&self, name: &str) -> Result<(&str, &[String])> {
        self.topics
            .iter()
            .find(|(topic, _)| topic.eq_ignore_ascii_case(name))
            .map(|(topic, keywords)| (topic.as_str(), keywords.as_slice()))
            .ok_or_else(|| EngineError::UnknownTopic {
                name: name.to_string(),
            })
    }
}

/// Builder for AnalysisConfig
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the account list
    pub fn accounts(mut self, accounts: Vec<Account>) -> Self {
        self.config.accounts = accounts;
        self
    }

    /// Add one account
    pub fn account(mut self, id: u64, name: impl Into<String>) -> Self {
        self.config.accounts.push(Account::new(id, name));
        self
    }

    /// Add or replace a topic
    pub fn topic<S: Into<String>>(mut self, name: S, keywords: &[&str]) -> Self {
        self.config.topics.insert(
            name.into(),
            keywords.iter().map(|k| k.to_string()).collect(),
        );
        self
    }

    /// Set the root filter
    pub fn root_filter(mut self, filter: RootFilter) -> Self {
        self.config.root_filter = filter;
        self
    }

    /// Set the empty bucket policy
    pub fn empty_buckets(mut self, policy: EmptyBucketPolicy) -> Self {
        self.config.empty_buckets = policy;
        self
    }

    /// Set the progress interval
    pub fn progress_interval(mut self, interval: usize) -> Self {
        self.config.progress_interval = interval;
        self
    }

    /// Set the number of histogram bins
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.config.histogram_bins = bins;
        self
    }

    /// Keep raw samples in topic reports
    pub fn include_samples(mut self, include: bool) -> Self {
        self.config.include_samples = include;
        self
    }

    /// Set the local zone offset in minutes east of UTC
    pub fn utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.config.time.utc_offset_minutes = minutes;
        self
    }

    /// Set the hour-of-day rotation
    pub fn hour_shift(mut self, shift: u8) -> Self {
        self.config.time.hour_shift = shift;
        self
    }

    /// Set the leap day policy
    pub fn leap_day(mut self, policy: LeapDayPolicy) -> Self {
        self.config.time.leap_day = policy;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AnalysisConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.accounts.len(), 13);
        assert_eq!(config.topics.len(), 5);
        assert_eq!(config.progress_interval, 1000);
        assert_eq!(config.time.hour_shift, 2);
    }

    #[test]
    fn test_topics_keep_configured_order() {
        let default_config = AnalysisConfig::default();
        let defaults: Vec<&str> = default_config
            .topics
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(defaults, ["Food", "Luggage", "Delay", "Space", "Service"]);

        let config = AnalysisConfig::from_toml_str(
            r#"
[topics]
wifi = ["wifi", "internet"]
boarding = ["gate", "boarding"]
"#,
        )
        .unwrap();
        let names: Vec<&str> = config.topics.keys().map(String::as_str).collect();
        assert_eq!(names, ["wifi", "boarding"]);

        let rendered = AnalysisConfig::from_toml_str(&config.to_toml_string().unwrap()).unwrap();
        assert_eq!(rendered.topics, config.topics);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AnalysisConfig::builder()
            .accounts(vec![Account::new(1, "one")])
            .utc_offset_minutes(120)
            .build()
            .unwrap();

        let rendered = config.to_toml_string().unwrap();
        let parsed = AnalysisConfig::from_toml_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AnalysisConfig::from_toml_str(
            r#"
progress_interval = 50
empty_buckets = "skip"

[time]
leap_day = "reject"
"#,
        )
        .unwrap();

        assert_eq!(config.progress_interval, 50);
        assert_eq!(config.empty_buckets, EmptyBucketPolicy::Skip);
        assert_eq!(config.time.leap_day, LeapDayPolicy::Reject);
        assert_eq!(config.time.hour_shift, 2);
        assert_eq!(config.accounts.len(), 13);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(AnalysisConfig::builder().progress_interval(0).build().is_err());
        assert!(AnalysisConfig::builder().histogram_bins(0).build().is_err());
        assert!(AnalysisConfig::builder().hour_shift(24).build().is_err());
        assert!(AnalysisConfig::builder()
            .utc_offset_minutes(19 * 60)
            .build()
            .is_err());
        assert!(AnalysisConfig::builder()
            .account(56377143, "KLM again")
            .build()
            .is_err());
        assert!(AnalysisConfig::builder().topic("Empty", &[" "]).build().is_err());
    }

    #[test]
    fn test_lookups() {
        let config = AnalysisConfig::default();
        assert_eq!(config.account(22536055).unwrap().name, "AmericanAir");
        assert!(matches!(
            config.account(1),
            Err(EngineError::UnknownAccount { id: 1 })
        ));
        assert!(config.topic("luggage").unwrap().contains(&"suitcase".to_string()));
        assert!(config.topic("weather").is_err());
    }
}
