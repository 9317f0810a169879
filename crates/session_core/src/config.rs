//! Session configuration loaded from TOML

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::types::TimeMode;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub recommender: RecommenderConfig,
    pub clock: ClockConfig,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_filter: Option<String>,
}

/// Where and how to reach the best-move service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    /// Total tries per request; 1 means no retry
    pub max_attempts: u32,
    pub retry_backoff_ms: u64,
    /// Thinking time forwarded to the service, in seconds
    pub time_limit: Option<f64>,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_ms: 5_000,
            max_attempts: 1,
            retry_backoff_ms: 250,
            time_limit: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub mode: TimeMode,
}

impl SessionConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
