//! Run configuration.
//!
//! A YAML file describes one sweep over languages, directions and selection
//! strategies. Values are validated once at load; CLI flags may override
//! individual fields before validation.

use crate::order::{InvalidOrder, OrderPolicy};
use crate::prompt::{Language, PromptError, Template};
use crate::selection::{split_strategies, SelectionError, DEFAULT_MAX_DRAWS_PER_SHOT};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML configuration: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Order(#[from] InvalidOrder),

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// Whether English is the target (`into`) or the source (`outof`)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Foreign language into English
    Into,
    /// English into the foreign language
    Outof,
}

impl Direction {
    /// Name used in paths and output file names
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Into => "into",
            Self::Outof => "outof",
        }
    }

    /// `(source, target)` languages for a foreign language `lang`
    #[must_use]
    pub const fn languages(self, lang: Language) -> (Language, Language) {
        match self {
            Self::Into => (lang, Language::En),
            Self::Outof => (Language::En, lang),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "into" => Ok(Self::Into),
            "outof" => Ok(Self::Outof),
            _ => Err(ConfigError::InvalidValue {
                field: "direction".to_string(),
                reason: format!("{s:?} is not one of into, outof"),
            }),
        }
    }
}

/// Complete run configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunConfig {
    /// Sweep and prompting settings
    pub run: RunSettings,
    /// Dataset and output locations
    pub data: DataSettings,
    /// Generation backend (required only for `run`)
    #[serde(default)]
    pub generator: Option<GeneratorSettings>,
}

/// Sweep and prompting settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunSettings {
    /// Foreign languages paired with English
    pub languages: Vec<Language>,
    /// Translation directions
    #[serde(default = "default_directions")]
    pub directions: Vec<Direction>,
    /// Selection names; `+` combines strategies
    pub selections: Vec<String>,
    /// In-context examples per prompt
    #[serde(default = "default_shot")]
    pub shot: usize,
    /// Example order
    #[serde(default)]
    pub order: OrderPolicy,
    /// Prompt template
    #[serde(default)]
    pub template: Template,
    /// Prompts per generation call
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Keep only the first N test items
    #[serde(default)]
    pub cut: Option<usize>,
    /// Random seed for backfill and random ordering
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Random draws allowed per missing example during backfill
    #[serde(default = "default_max_draws_per_shot")]
    pub max_draws_per_shot: usize,
}

fn default_directions() -> Vec<Direction> {
    vec![Direction::Into, Direction::Outof]
}
const fn default_shot() -> usize {
    4
}
const fn default_batch_size() -> usize {
    4
}
const fn default_seed() -> u64 {
    42
}
const fn default_max_draws_per_shot() -> usize {
    DEFAULT_MAX_DRAWS_PER_SHOT
}

/// Dataset and output locations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataSettings {
    /// Root holding one directory per language
    pub root: PathBuf,
    /// Directory receiving answer files
    pub output_dir: PathBuf,
}

/// Local command used for generation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratorSettings {
    /// Executable to run per batch
    pub command: String,
    /// Extra arguments
    #[serde(default)]
    pub args: Vec<String>,
}

impl RunConfig {
    /// Load and validate a run configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a run configuration from a YAML string
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed or fails validation.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns the first constraint violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let run = &self.run;

        if run.languages.is_empty() {
            return Err(ConfigError::MissingField("run.languages".to_string()));
        }
        if run.directions.is_empty() {
            return Err(ConfigError::MissingField("run.directions".to_string()));
        }
        if run.selections.is_empty() {
            return Err(ConfigError::MissingField("run.selections".to_string()));
        }
        if let Some(lang) = run.languages.iter().find(|l| **l == Language::En) {
            return Err(ConfigError::InvalidValue {
                field: "run.languages".to_string(),
                reason: format!("{lang} is always one side of the pair; list only foreign languages"),
            });
        }
        if run.shot == 0 {
            return Err(invalid("run.shot", "must be greater than zero"));
        }
        if run.batch_size == 0 {
            return Err(invalid("run.batch_size", "must be greater than zero"));
        }
        if run.max_draws_per_shot == 0 {
            return Err(invalid("run.max_draws_per_shot", "must be greater than zero"));
        }
        if run.cut == Some(0) {
            return Err(invalid("run.cut", "must be greater than zero when set"));
        }
        for selection in &run.selections {
            split_strategies(selection, run.shot)?;
        }

        Ok(())
    }
}

/// Command-line overrides applied on top of the YAML file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub languages: Option<Vec<String>>,
    pub directions: Option<Vec<String>>,
    pub selections: Option<Vec<String>>,
    pub shot: Option<usize>,
    pub order: Option<String>,
    pub template: Option<String>,
    pub batch_size: Option<usize>,
    pub cut: Option<usize>,
    pub seed: Option<u64>,
    pub output_dir: Option<PathBuf>,
}

impl RunConfig {
    /// Apply `overrides` and re-validate
    ///
    /// # Errors
    ///
    /// Returns an error if an override does not parse or the resulting
    /// configuration is invalid.
    pub fn apply_overrides(&mut self, overrides: Overrides) -> Result<(), ConfigError> {
        let run = &mut self.run;

        if let Some(languages) = overrides.languages {
            run.languages = languages
                .iter()
                .map(|l| l.parse::<Language>())
                .collect::<Result<_, _>>()?;
        }
        if let Some(directions) = overrides.directions {
            run.directions = directions
                .iter()
                .map(|d| d.parse::<Direction>())
                .collect::<Result<_, _>>()?;
        }
        if let Some(selections) = overrides.selections {
            run.selections = selections;
        }
        if let Some(order) = overrides.order {
            run.order = order.parse()?;
        }
        if let Some(template) = overrides.template {
            run.template = template.parse()?;
        }
        run.shot = overrides.shot.unwrap_or(run.shot);
        run.batch_size = overrides.batch_size.unwrap_or(run.batch_size);
        run.seed = overrides.seed.unwrap_or(run.seed);
        if overrides.cut.is_some() {
            run.cut = overrides.cut;
        }
        if let Some(output_dir) = overrides.output_dir {
            self.data.output_dir = output_dir;
        }

        self.validate()
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
