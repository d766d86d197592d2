pub mod builder;

pub use builder::PipelineConfigBuilder;

use crate::error::{BookshelfError, BookshelfResult};
use crate::ident::ISBN_PATTERN;
use crate::pipeline::stages::RangeBound;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Where and how to reach the record source
    pub source: SourceConfig,

    /// Sensitive word handling
    pub purity: PurityConfig,

    /// Pattern passed to the ID utility when adding books
    pub isbn_pattern: String,

    /// Stage settings applied before the first run
    pub stages: StageSettings,
}

/// Record source connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub address: String,
    pub port: u16,

    /// Connect attempts before giving up
    pub max_attempts: u32,

    /// Delay between connect attempts
    pub retry_delay_ms: u64,
}

/// Word purity settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PurityConfig {
    /// Words registered with the purity service at construction
    pub sensitive_words: Vec<String>,

    /// Initial value of the purity bypass flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
}

/// Initial per-stage settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StageSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_word: Option<String>,

    pub ignore_case: bool,

    /// `ASC` or `DESC`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<(RangeBound, RangeBound)>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            purity: PurityConfig::default(),
            isbn_pattern: ISBN_PATTERN.to_string(),
            stages: StageSettings::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            address: "http://localhost".to_string(),
            port: 4000,
            max_attempts: 5,
            retry_delay_ms: 1000,
        }
    }
}

impl Default for PurityConfig {
    fn default() -> Self {
        Self {
            sensitive_words: vec!["Copperfield".to_string(), "Wonderland".to_string()],
            disabled: None,
        }
    }
}

impl SourceConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Settings for tests: default address, no delay between attempts
    pub fn instant() -> Self {
        Self {
            retry_delay_ms: 0,
            ..Self::default()
        }
    }
}

impl PipelineConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> BookshelfResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> BookshelfResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Check invariants the pipeline relies on
    pub fn validate(&self) -> BookshelfResult<()> {
        if self.source.address.trim().is_empty() {
            return Err(BookshelfError::ConfigError(
                "source address must not be empty".to_string(),
            ));
        }
        if self.source.max_attempts == 0 {
            return Err(BookshelfError::ConfigError(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if self.isbn_pattern.is_empty() {
            return Err(BookshelfError::ConfigError(
                "isbn_pattern must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
