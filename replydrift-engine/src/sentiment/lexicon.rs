//! Rule-based lexicon scorer
//!
//! Scores follow the VADER recipe in a reduced form: word valences from a
//! lexicon, booster words scaling the word that follows them, negation within
//! a three token window, and a final normalization of the summed valence into
//! `[-1, 1]`.

use crate::error::{EngineError, Result};
use crate::sentiment::SentimentScorer;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// Factor applied to a negated valence
pub const NEGATION_SCALAR: f64 = -0.74;

/// Normalization constant: `s / sqrt(s^2 + ALPHA)`
pub const NORMALIZATION_ALPHA: f64 = 15.0;

/// Tokens before a word searched for a negator
const NEGATION_WINDOW: usize = 3;

/// Largest absolute valence accepted in a lexicon
const MAX_VALENCE: f64 = 4.0;

/// Letters, digits and apostrophes make up a token
const TOKEN_PATTERN: &str = r"[\p{L}\p{N}'\x{2019}]+";

static EMBEDDED: OnceLock<std::result::Result<Arc<LexiconScorer>, String>> = OnceLock::new();

/// Root lexicon configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconConfig {
    /// Lexicon identity
    pub metadata: Metadata,
    /// Word to valence
    pub words: BTreeMap<String, f64>,
    /// Negators and boosters
    #[serde(default)]
    pub modifiers: Modifiers,
}

/// Lexicon metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Short language code
    pub code: String,
    /// Display name
    pub name: String,
}

/// Words that modify the valence of their neighbours
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Modifiers {
    /// Words that flip a following valence
    #[serde(default)]
    pub negators: Vec<String>,
    /// Word to relative intensity change of the next word
    #[serde(default)]
    pub boosters: BTreeMap<String, f64>,
}

/// Lexicon-based sentiment scorer
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    code: String,
    name: String,
    words: HashMap<String, f64>,
    negators: HashSet<String>,
    boosters: HashMap<String, f64>,
    token: Regex,
}

impl LexiconScorer {
    /// The embedded English lexicon
    pub fn english() -> Result<Arc<LexiconScorer>> {
        EMBEDDED
            .get_or_init(|| {
                let config: LexiconConfig =
                    toml::from_str(include_str!("../../configs/lexicon/english.toml"))
                        .map_err(|e| format!("failed to parse embedded lexicon: {e}"))?;
                LexiconScorer::from_config(&config)
                    .map(Arc::new)
                    .map_err(|e| e.to_string())
            })
            .clone()
            .map_err(EngineError::Lexicon)
    }

    /// Build from a parsed configuration
    pub fn from_config(config: &LexiconConfig) -> Result<Self> {
        if config.words.is_empty() {
            return Err(EngineError::Lexicon(format!(
                "lexicon '{}' defines no words",
                config.metadata.code
            )));
        }

        for (word, valence) in &config.words {
            if !valence.is_finite() || valence.abs() > MAX_VALENCE {
                return Err(EngineError::Lexicon(format!(
                    "valence of '{word}' must be within -{MAX_VALENCE}..{MAX_VALENCE}, got {valence}"
                )));
            }
        }

        for (word, boost) in &config.modifiers.boosters {
            if !boost.is_finite() || boost.abs() >= 1.0 {
                return Err(EngineError::Lexicon(format!(
                    "booster '{word}' must be strictly between -1 and 1, got {boost}"
                )));
            }
        }

        let token = Regex::new(TOKEN_PATTERN)
            .map_err(|e| EngineError::Lexicon(format!("invalid token pattern: {e}")))?;

        Ok(Self {
            code: config.metadata.code.clone(),
            name: config.metadata.name.clone(),
            words: config
                .words
                .iter()
                .map(|(w, v)| (normalize_token(w), *v))
                .collect(),
            negators: config
                .modifiers
                .negators
                .iter()
                .map(|w| normalize_token(w))
                .collect(),
            boosters: config
                .modifiers
                .boosters
                .iter()
                .map(|(w, v)| (normalize_token(w), *v))
                .collect(),
            token,
        })
    }

    /// Parse a TOML lexicon
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: LexiconConfig = toml::from_str(content)
            .map_err(|e| EngineError::Lexicon(format!("failed to parse lexicon: {e}")))?;
        Self::from_config(&config)
    }

    /// Load a TOML lexicon file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            EngineError::IoError(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Lexicon language code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Lexicon display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of scored words
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        self.token
            .find_iter(text)
            .map(|m| normalize_token(m.as_str()))
            .filter(|t| !t.is_empty())
            .collect()
    }

    fn is_negator(&self, token: &str) -> bool {
        self.negators.contains(token) || token.ends_with("n't")
    }

    /// Sum of adjusted valences before normalization
    pub fn raw_valence(&self, text: &str) -> f64 {
        let tokens = self.tokenize(text);
        let mut sum = 0.0;

        for (i, token) in tokens.iter().enumerate() {
            let Some(&valence) = self.words.get(token) else {
                continue;
            };

            let mut adjusted = valence;
            if let Some(boost) = i
                .checked_sub(1)
                .and_then(|prev| self.boosters.get(&tokens[prev]))
            {
                adjusted *= 1.0 + boost;
            }

            let window = &tokens[i.saturating_sub(NEGATION_WINDOW)..i];
            if window.iter().any(|t| self.is_negator(t)) {
                adjusted *= NEGATION_SCALAR;
            }

            sum += adjusted;
        }

        sum
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> f64 {
        normalize(self.raw_valence(text))
    }
}

/// Map a summed valence into `[-1, 1]`
pub fn normalize(sum: f64) -> f64 {
    if sum == 0.0 {
        return 0.0;
    }
    (sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn normalize_token(token: &str) -> String {
    token
        .trim()
        .replace('\u{2019}', "'")
        .trim_matches('\'')
        .to_lowercase()
}
