//! Runtime configuration.
//!
//! Plain serde structs loadable from YAML or JSON. Durations are
//! human-readable strings ("15s", "2m") parsed with humantime; API keys are
//! never part of the config file and come from the environment instead.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors from configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid duration '{value}': {message}")]
    InvalidDuration { value: String, message: String },
}

fn default_preferred_source() -> String {
    "brave".to_string()
}

fn default_max_results() -> usize {
    50
}

fn default_request_timeout() -> String {
    "30s".to_string()
}

fn default_batch_size() -> usize {
    10
}

fn default_min_confidence() -> f64 {
    0.5
}

/// News cross-referencing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    /// Backend tried first; the rest serve as fallback
    #[serde(default = "default_preferred_source")]
    pub preferred_source: String,

    /// Search keywords; empty means the built-in environmental set
    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Upper bound on the whole news stage, e.g. "30s"
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,

    #[serde(default = "default_batch_size")]
    pub extraction_batch_size: usize,

    #[serde(default = "default_min_confidence")]
    pub min_event_confidence: f64,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            preferred_source: default_preferred_source(),
            keywords: Vec::new(),
            max_results: default_max_results(),
            request_timeout: default_request_timeout(),
            extraction_batch_size: default_batch_size(),
            min_event_confidence: default_min_confidence(),
        }
    }
}

impl NewsConfig {
    /// The stage timeout as a Duration.
    pub fn request_timeout(&self) -> Result<Duration, ConfigError> {
        humantime::parse_duration(&self.request_timeout).map_err(|e| {
            ConfigError::InvalidDuration {
                value: self.request_timeout.clone(),
                message: e.to_string(),
            }
        })
    }
}

fn default_model() -> String {
    "claude-sonnet-4-5".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_temperature() -> f32 {
    0.1
}

fn default_llm_timeout() -> String {
    "30s".to_string()
}

/// LLM settings for event extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Per-call timeout, e.g. "30s"
    #[serde(default = "default_llm_timeout")]
    pub timeout: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout: default_llm_timeout(),
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        humantime::parse_duration(&self.timeout).map_err(|e| ConfigError::InvalidDuration {
            value: self.timeout.clone(),
            message: e.to_string(),
        })
    }

    /// Build a completion config from these settings.
    pub fn completion_config(&self) -> Result<crate::providers::CompletionConfig, ConfigError> {
        Ok(crate::providers::CompletionConfig {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout: self.timeout()?,
        })
    }
}

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub news: NewsConfig,

    #[serde(default)]
    pub llm: LlmConfig,
}

impl RuntimeConfig {
    /// Parse from a YAML string (JSON is valid YAML).
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from a YAML or JSON file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }
}
