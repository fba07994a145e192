//! Configuration section types and defaults.

use crate::commands::SamplingMethod;
use serde::{Deserialize, Serialize};

/// Default cap on cached wildcard patterns.
pub const DEFAULT_CACHE_LIMIT: usize = 100;

/// How templates are sampled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SamplingConfig {
    /// Default sampling method (default: random).
    pub method: SamplingMethod,

    /// Seed for the random number generator. Unseeded contexts use OS entropy.
    pub seed: Option<u64>,

    /// Collapse whitespace runs in rendered prompts.
    pub ignore_whitespace: bool,

    /// Text substituted for variables with no binding and no default.
    /// Unset means such variables are an error.
    pub unknown_variable_value: Option<String>,
}
