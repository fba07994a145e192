//! Random sampling: infinite streams of weighted picks.

use super::context::SamplingContext;
use super::helpers::{choose_index, weighted_sample_without_replacement};
use super::result::SamplingResult;
use super::sampler::{ResolvedWildcard, Sampler, WrapJoiner, expand_single_wildcard, missing_wildcard};
use super::stream::{ResultStream, Zip, lazy, lazy_command, repeat};
use crate::commands::{LiteralCommand, SequenceCommand, VariantCommand, WildcardCommand, WrapCommand};
use crate::error::Result;
use rand::Rng;
use std::iter;

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSampler;

impl Sampler for RandomSampler {
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

    fn variant(&self, command: &VariantCommand, context: &SamplingContext) -> Result<ResultStream> {
        let command = command.clone();
        let context = context.clone();
        Ok(lazy(move || {
            let (context, command) = expand_single_wildcard(&command, &context)?;
            if command.is_empty() {
                return Ok(repeat(SamplingResult::default()));
            }

            let weights = command.weights();
            let min = command.effective_min_bound();
            let max = command.effective_max_bound();
            let mut streams: Vec<ResultStream> = command
                .values()
                .map(|value| lazy_command(&context, value))
                .collect();

            Ok(Box::new(iter::from_fn(move || {
                let picks = {
                    let mut rng = context.rng().borrow_mut();
                    let k = rng.random_range(min..=max);
                    weighted_sample_without_replacement(&weights, k, &mut *rng)
                };
                let mut parts = Vec::with_capacity(picks.len());
                for index in picks {
                    match streams[index].next()? {
                        Ok(result) => parts.push(result),
                        Err(e) => return Some(Err(e)),
                    }
                }
                Some(Ok(SamplingResult::joined(&parts, &command.separator)))
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

            let values = resolved.commands()?;
            let weights = resolved.values.weights();
            let weighted = resolved.values.has_varied_weights();
            let context = resolved.context;

            Ok(Box::new(iter::from_fn(move || {
                let index = choose_index(&weights, weighted, &mut *context.rng().borrow_mut());
                let first = context
                    .generator_from_command(&values[index])
                    .map(|mut stream| stream.next());
                match first {
                    Ok(Some(result)) => Some(result),
                    Ok(None) => Some(Ok(SamplingResult::default())),
                    Err(e) => Some(Err(e)),
                }
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
