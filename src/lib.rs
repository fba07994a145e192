//! wildprompt: a prompt template engine for image-generation pipelines.
//!
//! Templates mix plain text with variants (`{red|green|blue}`), wildcards
//! (`__colors__`, resolved from files), variables (`${size=big}`, `${size}`)
//! and wrap commands (`%{in a … style$$${subject}}`). A template is parsed
//! once into a [`Command`] tree and then sampled as a lazy stream of
//! prompts, randomly, exhaustively (combinatorial) or round-robin (cyclical).
//!
//! ```
//! use wildprompt::commands::SamplingMethod;
//! use wildprompt::sampling::SamplingContext;
//! use wildprompt::wildcards::WildcardManager;
//! use std::rc::Rc;
//!
//! let wildcards = WildcardManager::from_collections([("colors", vec!["red", "blue"])]);
//! let context = SamplingContext::builder()
//!     .default_sampling_method(SamplingMethod::Combinatorial)
//!     .wildcard_manager(Rc::new(wildcards))
//!     .build();
//!
//! let prompts: Vec<String> = context
//!     .sample_prompts("a __colors__ {cube|ball}", None)?
//!     .collect::<wildprompt::Result<_>>()?;
//! assert_eq!(prompts, vec!["a red cube", "a red ball", "a blue cube", "a blue ball"]);
//! # Ok::<(), wildprompt::PromptError>(())
//! ```
//!
//! The library logs non-fatal conditions (missing wildcards, ignored
//! values) through `tracing`; install a subscriber to see them.

pub mod commands;
pub mod config;
pub mod error;
pub mod generators;
pub mod parser;
pub mod sampling;
pub mod utils;
pub mod wildcards;

#[cfg(test)]
mod test_support;

pub use commands::{Command, SamplingMethod};
pub use config::Config;
pub use error::{PromptError, Result};
pub use parser::{parse, parse_with_config};
pub use sampling::{PromptStream, SamplingContext, SamplingResult};

/// Sample prompts from `template` with a default random context and no
/// wildcards.
///
/// `n = None` yields an endless stream.
///
/// ```
/// let prompts: Vec<String> = wildprompt::sample_prompts("a {cat|dog}", Some(3))?
///     .collect::<wildprompt::Result<_>>()?;
/// assert_eq!(prompts.len(), 3);
/// # Ok::<(), wildprompt::PromptError>(())
/// ```
pub fn sample_prompts(template: &str, n: Option<usize>) -> Result<PromptStream> {
    SamplingContext::default().sample_prompts(template, n)
}
