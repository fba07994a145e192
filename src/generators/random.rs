use super::{GeneratorError, PromptGenerator, collect_prompts};
use crate::commands::SamplingMethod;
use crate::config::Config;
use crate::sampling::SamplingContext;
use crate::wildcards::WildcardManager;
use std::rc::Rc;

/// Generates random prompts. Successive calls continue the same random
/// sequence.
#[derive(Debug, Clone)]
pub struct RandomPromptGenerator {
    context: SamplingContext,
}

impl RandomPromptGenerator {
    /// Number of prompts generated when no count is given.
    pub const DEFAULT_COUNT: usize = 1;

    pub fn new(wildcards: Rc<WildcardManager>, seed: Option<u64>) -> Self {
        let mut builder = SamplingContext::builder()
            .default_sampling_method(SamplingMethod::Random)
            .wildcard_manager(wildcards);
        if let Some(seed) = seed {
            builder = builder.seed(seed);
        }
        Self {
            context: builder.build(),
        }
    }

    /// Use the configured parser, wildcards and seed, forcing random sampling.
    pub fn from_config(config: &Config) -> Self {
        Self {
            context: SamplingContext::from_config(config).with_sampling_method(SamplingMethod::Random),
        }
    }

    pub fn context(&self) -> &SamplingContext {
        &self.context
    }
}

impl Default for RandomPromptGenerator {
    fn default() -> Self {
        Self::new(Rc::new(WildcardManager::empty()), None)
    }
}

impl PromptGenerator for RandomPromptGenerator {
    /// Random streams never end, so `None` means [`Self::DEFAULT_COUNT`].
    fn generate(&self, template: &str, n: Option<usize>) -> Result<Vec<String>, GeneratorError> {
        collect_prompts(&self.context, template, Some(n.unwrap_or(Self::DEFAULT_COUNT)))
    }
}
