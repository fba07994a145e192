//! Prompt generators: ready-made wrappers around a [`SamplingContext`].
//!
//! ```
//! use wildprompt::generators::{CombinatorialPromptGenerator, PromptGenerator};
//!
//! let generator = CombinatorialPromptGenerator::default();
//! let prompts = generator.generate("a {red|blue} ball", None).unwrap();
//! assert_eq!(prompts, vec!["a red ball", "a blue ball"]);
//! ```

mod combinatorial;
mod random;

#[cfg(test)]
mod tests;

pub use combinatorial::CombinatorialPromptGenerator;
pub use random::RandomPromptGenerator;

use crate::error::PromptError;
use crate::sampling::SamplingContext;
use thiserror::Error;

/// Failure surfaced by a [`PromptGenerator`].
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// Parsing or sampling the template failed.
    #[error("failed to generate prompts: {0}")]
    Prompt(#[from] PromptError),
}

/// Turns a template into a list of prompts.
pub trait PromptGenerator {
    /// Generate up to `n` prompts from `template`.
    fn generate(&self, template: &str, n: Option<usize>) -> Result<Vec<String>, GeneratorError>;
}

fn collect_prompts(
    context: &SamplingContext,
    template: &str,
    n: Option<usize>,
) -> Result<Vec<String>, GeneratorError> {
    let prompts = context
        .sample_prompts(template, n)?
        .collect::<crate::Result<Vec<_>>>()?;
    Ok(prompts)
}
