//! Sampling of parsed templates.
//!
//! A [`SamplingContext`] turns a [`Command`](crate::commands::Command) tree
//! into a lazy stream of prompts. Each node is expanded by the [`Sampler`]
//! for its effective method:
//!
//! - [`RandomSampler`]: infinite, weighted random picks
//! - [`CombinatorialSampler`]: finite, every distinct outcome once
//! - [`CyclicalSampler`]: infinite round-robin over the combinatorial outcomes
//!
//! A node without an explicit method inherits the context's. A combinatorial
//! node inside a random or cyclical one cannot be exhausted and is sampled
//! with the parent's method instead (a warning is logged).

mod combinatorial;
mod context;
mod cyclical;
mod helpers;
mod random;
mod result;
mod sampler;
mod stream;


pub use combinatorial::CombinatorialSampler;
pub use context::{PromptSource, PromptStream, SamplingContext, SamplingContextBuilder};
pub use cyclical::CyclicalSampler;
pub use random::RandomSampler;
pub use result::SamplingResult;
pub use sampler::{Sampler, sampler_for};
pub use stream::ResultStream;
