use super::{GeneratorError, PromptGenerator, collect_prompts};
use crate::commands::SamplingMethod;
use crate::config::Config;
use crate::sampling::SamplingContext;
use crate::wildcards::WildcardManager;
use std::rc::Rc;

/// Generates every distinct prompt a template can produce.
#[derive(Debug, Clone)]
pub struct CombinatorialPromptGenerator {
    context: SamplingContext,
}

impl CombinatorialPromptGenerator {
    pub fn new(wildcards: Rc<WildcardManager>) -> Self {
        Self {
            context: SamplingContext::builder()
                .default_sampling_method(SamplingMethod::Combinatorial)
                .wildcard_manager(wildcards)
                .build(),
        }
    }

    /// Use the configured parser and wildcards, forcing combinatorial sampling.
    pub fn from_config(config: &Config) -> Self {
        Self {
            context: SamplingContext::from_config(config)
                .with_sampling_method(SamplingMethod::Combinatorial),
        }
    }

    pub fn context(&self) -> &SamplingContext {
        &self.context
    }
}

impl Default for CombinatorialPromptGenerator {
    fn default() -> Self {
        Self::new(Rc::new(WildcardManager::empty()))
    }
}

impl PromptGenerator for CombinatorialPromptGenerator {
    /// `None` generates every prompt.
    fn generate(&self, template: &str, n: Option<usize>) -> Result<Vec<String>, GeneratorError> {
        collect_prompts(&self.context, template, n)
    }
}
