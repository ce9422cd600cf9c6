//! Registry configuration.
//!
//! Configuration can be loaded from:
//! - Environment variables (EPUBSUB_*)
//! - TOML configuration file or string

use crate::error::PubSubError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding [`RegistryConfig::max_history`].
pub const MAX_HISTORY_ENV: &str = "EPUBSUB_MAX_HISTORY";

/// Registry configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Maximum events kept per namespace log. `None` keeps every event.
    #[serde(default)]
    pub max_history: Option<usize>,
}

impl RegistryConfig {
    /// Defaults with environment overrides applied.
    #[must_use]
    pub fn from_env() -> Self {
        let value = std::env::var(MAX_HISTORY_ENV).ok();
        Self {
            max_history: parse_max_history(value.as_deref()),
        }
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid configuration.
    pub fn from_toml_str(contents: &str) -> Result<Self, PubSubError> {
        toml::from_str(contents).map_err(|e| PubSubError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PubSubError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PubSubError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        toml::from_str(&contents).map_err(|e| {
            PubSubError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Set the per-namespace history limit.
    #[must_use]
    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = Some(max_history);
        self
    }
}

/// Parse a history limit. Missing or malformed values mean unbounded.
fn parse_max_history(value: Option<&str>) -> Option<usize> {
    value.and_then(|v| v.trim().parse().ok())
}
