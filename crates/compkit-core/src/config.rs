//! Runtime configuration (compkit.toml)
//!
//! ```toml
//! [list]
//! name_cache = true      # accelerate name lookups in child lists
//! cache_capacity = 256   # cached names per list before the cache is dropped
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Child list settings
    #[serde(default)]
    pub list: ListConfig,
}

impl CoreConfig {
    /// Parse configuration from a TOML string
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}

/// Child list settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListConfig {
    /// Whether name lookups go through the lookup cache
    #[serde(default = "default_name_cache")]
    pub name_cache: bool,

    /// Maximum number of cached names before the cache is dropped
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_name_cache() -> bool {
    true
}

fn default_cache_capacity() -> usize {
    256
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            name_cache: default_name_cache(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl ListConfig {
    /// Configuration with the lookup cache turned off
    pub fn uncached() -> Self {
        Self {
            name_cache: false,
            ..Self::default()
        }
    }
}
