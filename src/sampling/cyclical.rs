//! Cyclical sampling: infinite round-robin over the combinatorial outcomes.

use super::combinatorial::variant_combinations;
use super::context::SamplingContext;
use super::result::SamplingResult;
use super::sampler::{ResolvedWildcard, Sampler, WrapJoiner, expand_single_wildcard, missing_wildcard};
use super::stream::{ResultStream, Zip, lazy, lazy_command, repeat};
use crate::commands::{LiteralCommand, SamplingMethod, SequenceCommand, VariantCommand, WildcardCommand, WrapCommand};
use crate::error::Result;
use std::iter;

#[derive(Debug, Clone, Copy, Default)]
pub struct CyclicalSampler;

impl Sampler for CyclicalSampler {
    fn literal(&self, command: &LiteralCommand, _context: &SamplingContext) -> Result<ResultStream> {
        Ok(repeat(SamplingResult::new(command.literal.clone())))
    }

    fn sequence(&self, command: &SequenceCommand, context: &SamplingContext) -> Result<ResultStream> {
        let command = command.clone();
        let context = context.clone();
        Ok(lazy(move || {
            let (context, tokens) = context.process_variable_assignments(&command.tokens)?;
            let streams = tokens.iter().map(|t| lazy_command(&context, t)).collect();
            let separator = command.separator;
            Ok(Box::new(
                Zip::new(streams).map(move |parts| parts.map(|p| SamplingResult::joined(&p, &separator))),
            ))
        }))
    }

    /// Cycle through the variant's combinatorial renderings, in order.
    fn variant(&self, command: &VariantCommand, context: &SamplingContext) -> Result<ResultStream> {
        let command = command.clone();
        let context = context.clone();
        Ok(lazy(move || {
            let (context, command) = expand_single_wildcard(&command, &context)?;
            if command.is_empty() {
                return Ok(repeat(SamplingResult::default()));
            }

            let combinations = variant_combinations(
                context.with_sampling_method(SamplingMethod::Combinatorial),
                &command,
            )
            .collect::<Result<Vec<_>>>()?;

            let mut position = 0;
            Ok(Box::new(iter::from_fn(move || {
                let result = combinations.get(position)?.clone();
                position = (position + 1) % combinations.len();
                Some(Ok(result))
            })))
        }))
    }

    fn wildcard(&self, command: &WildcardCommand, context: &SamplingContext) -> Result<ResultStream> {
        let command = command.clone();
        let context = context.clone();
        Ok(lazy(move || {
            let resolved = ResolvedWildcard::resolve(&command, &context)?;
            if resolved.values.is_empty() {
                return Ok(repeat(missing_wildcard(&command, &context)));
            }

            let mut streams: Vec<ResultStream> = resolved
                .commands()?
                .iter()
                .map(|value| lazy_command(&resolved.context, value))
                .collect();

            let mut position = 0;
            Ok(Box::new(iter::from_fn(move || {
                let len = streams.len();
                let stream = streams.get_mut(position)?;
                position = (position + 1) % len;
                stream.next()
            })))
        }))
    }

    fn wrap(&self, command: &WrapCommand, context: &SamplingContext) -> Result<ResultStream> {
        let streams = vec![
            lazy_command(context, &command.wrapper),
            lazy_command(context, &command.inner),
        ];
        let mut joiner = WrapJoiner::default();
        Ok(Box::new(Zip::new(streams).map(move |parts| {
            parts.map(|p| joiner.join(&p[0], &p[1]))
        })))
    }
}
