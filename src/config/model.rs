//! Config struct definition.

use super::types::SamplingConfig;
use crate::parser::ParserConfig;
use crate::wildcards::WildcardConfig;
use serde::{Deserialize, Serialize};

/// Configuration for prompt generation.
///
/// ```yaml
/// parser:
///   variant_start: "{"
///   wildcard_wrap: "__"
/// sampling:
///   method: combinatorial
///   seed: 42
/// wildcards:
///   path: ./wildcards
///   sort: true
/// ```
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Template delimiters.
    pub parser: ParserConfig,

    /// Sampling method and options.
    pub sampling: SamplingConfig,

    /// Wildcard location and post-processing.
    pub wildcards: WildcardConfig,
}
