// Path: crates/types/src/config/mod.rs

//! Shared configuration structures for the repository components.
use crate::error::ConfigError;
use crate::interest::ChildSelector;
use crate::name::Component;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level repository configuration, usually loaded from `nrepo.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    /// Settings for the content index.
    pub index: IndexConfig,
    /// Settings for logging and metrics.
    pub telemetry: TelemetryConfig,
}

impl RepoConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: RepoConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Checks semantic constraints the schema cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.index.responder_component()?;
        if self.telemetry.log_filter.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "telemetry.log_filter",
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

/// Configuration for the content index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// URI-escaped component identifying this responder in enumeration
    /// response names.
    #[serde(default = "default_responder_id")]
    pub responder_id: String,
    /// Preference applied to Interests that carry no child selector.
    #[serde(default)]
    pub default_child_selector: ChildSelector,
}

fn default_responder_id() -> String {
    "nrepo".to_string()
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            responder_id: default_responder_id(),
            default_child_selector: ChildSelector::default(),
        }
    }
}

impl IndexConfig {
    /// Parses `responder_id` into a name component.
    pub fn responder_component(&self) -> Result<Component, ConfigError> {
        Ok(Component::try_from(self.responder_id.as_str())?)
    }
}

/// Output format for structured logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable multi-line output.
    Pretty,
}

/// Configuration for logging and metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Log line format.
    #[serde(default)]
    pub log_format: LogFormat,
    /// Whether to install the Prometheus metrics sink.
    #[serde(default)]
    pub metrics: bool,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            log_format: LogFormat::default(),
            metrics: false,
        }
    }
}
