//! Wildcard store settings.

use crate::config::types::DEFAULT_CACHE_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How wildcard values are loaded and post-processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WildcardConfig {
    /// Root directory of wildcard files. `None` means an empty store.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Drop repeated entries, keeping the first occurrence.
    #[serde(default = "default_dedup")]
    pub dedup: bool,

    /// Sort resolved values by their text.
    #[serde(default)]
    pub sort: bool,

    /// Shuffle resolved values. Takes precedence over `sort`.
    #[serde(default)]
    pub shuffle: bool,

    /// Seed for `shuffle`. Unseeded shuffles use OS entropy.
    #[serde(default)]
    pub shuffle_seed: Option<u64>,

    /// Number of cached pattern results after which the cache is cleared.
    #[serde(default = "default_cache_limit")]
    pub cache_limit: usize,
}

fn default_dedup() -> bool {
    true
}

fn default_cache_limit() -> usize {
    DEFAULT_CACHE_LIMIT
}

impl Default for WildcardConfig {
    fn default() -> Self {
        Self {
            path: None,
            dedup: default_dedup(),
            sort: false,
            shuffle: false,
            shuffle_seed: None,
            cache_limit: default_cache_limit(),
        }
    }
}
