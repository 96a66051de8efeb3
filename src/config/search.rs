//! Search configuration module.
//!
//! Settings for the trie traversal engine: worker pool size and case
//! handling.

use super::ConfigResult;
use super::Validate;
use crate::data_structures::kilo_trie::KiloTrieConfig;
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Upper bound on the worker pool size.
pub const MAX_WORKER_COUNT: usize = 1024;

/// Search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of worker slots used to traverse branch points in parallel
    pub worker_count: usize,

    /// Whether words and prefixes are matched case-sensitively
    pub case_sensitive: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            worker_count: num_cpus::get(),
            case_sensitive: true,
        }
    }
}

impl SearchConfig {
    /// Converts the search settings into a trie configuration.
    pub fn trie_config(&self) -> KiloTrieConfig {
        KiloTrieConfig::new()
            .with_worker_count(self.worker_count)
            .with_case_sensitive(self.case_sensitive)
    }
}

impl Validate for SearchConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.worker_count == 0 {
            return Err(ConfigError::ValidationError(
                "worker_count must be greater than 0".to_string(),
            ));
        }

        if self.worker_count > MAX_WORKER_COUNT {
            return Err(ConfigError::ValueOutOfRange {
                key: "search.worker_count".to_string(),
                message: format!("must be at most {MAX_WORKER_COUNT}"),
            });
        }

        Ok(())
    }
}
