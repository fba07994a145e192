//! Sampling strategies.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Strategy used to expand a command into prompts.
///
/// A command whose method is `None` inherits the method of the context it is
/// sampled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMethod {
    /// Infinite stream of weighted random picks (default).
    #[default]
    Random,
    /// Finite stream of every distinct outcome.
    Combinatorial,
    /// Infinite round-robin over the combinatorial outcomes.
    Cyclical,
}

impl SamplingMethod {
    /// Parse a sampling method from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "random" => Some(Self::Random),
            "combinatorial" => Some(Self::Combinatorial),
            "cyclical" => Some(Self::Cyclical),
            _ => None,
        }
    }

    /// Map a template sigil (`~`, `@`) to the method it selects.
    pub fn from_sigil(c: char) -> Option<Self> {
        match c {
            '~' => Some(Self::Random),
            '@' => Some(Self::Cyclical),
            _ => None,
        }
    }

    /// Whether streams of this method terminate.
    pub fn is_finite(self) -> bool {
        matches!(self, Self::Combinatorial)
    }

    /// Whether streams of this method are infinite.
    pub fn is_nonfinite(self) -> bool {
        !self.is_finite()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Combinatorial => "combinatorial",
            Self::Cyclical => "cyclical",
        }
    }
}

impl fmt::Display for SamplingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
