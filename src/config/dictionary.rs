//! Dictionary configuration module.
//!
//! Where the word list comes from and how its lines are cleaned up.

use super::ConfigResult;
use super::Validate;
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Dictionary configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Path to the word list, one word per line
    pub path: Option<PathBuf>,

    /// Whether surrounding whitespace is stripped from every line
    pub trim_whitespace: bool,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            path: None,
            trim_whitespace: true,
        }
    }
}

impl Validate for DictionaryConfig {
    fn validate(&self) -> ConfigResult<()> {
        if let Some(path) = &self.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationError(
                    "dictionary path cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}
