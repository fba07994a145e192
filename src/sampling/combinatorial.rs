//! Combinatorial sampling: finite streams of every distinct outcome.
//!
//! Finite children are expanded in full and combined as Cartesian products,
//! last factor varying fastest. A non-finite child (for example a `{~a|b}`
//! random variant) is pulled once per combination instead of being drained.

use super::context::SamplingContext;
use super::helpers::arrangements_between;
use super::result::SamplingResult;
use super::sampler::{ResolvedWildcard, Sampler, WrapJoiner, expand_single_wildcard, missing_wildcard};
use super::stream::{Product, ResultStream, Slot, lazy, once};
use crate::commands::{Command, LiteralCommand, SequenceCommand, VariantCommand, WildcardCommand, WrapCommand};
use crate::error::Result;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Default)]
pub struct CombinatorialSampler;

impl Sampler for CombinatorialSampler {
    fn literal(&self, command: &LiteralCommand, _context: &SamplingContext) -> Result<ResultStream> {
        Ok(once(SamplingResult::new(command.literal.clone())))
    }

    fn sequence(&self, command: &SequenceCommand, context: &SamplingContext) -> Result<ResultStream> {
        let command = command.clone();
        let context = context.clone();
        Ok(lazy(move || {
            let (context, tokens) = context.process_variable_assignments(&command.tokens)?;
            let slots = tokens
                .iter()
                .map(|token| Slot::for_command(&context, token))
                .collect::<Result<Vec<_>>>()?;
            let separator = command.separator;
            Ok(Box::new(
                Product::new(slots).map(move |parts| parts.map(|p| SamplingResult::joined(&p, &separator))),
            ))
        }))
    }

    fn variant(&self, command: &VariantCommand, context: &SamplingContext) -> Result<ResultStream> {
        let command = command.clone();
        let context = context.clone();
        Ok(lazy(move || {
            let (context, command) = expand_single_wildcard(&command, &context)?;
            Ok(variant_combinations(context, &command))
        }))
    }

    fn wildcard(&self, command: &WildcardCommand, context: &SamplingContext) -> Result<ResultStream> {
        let command = command.clone();
        let context = context.clone();
        Ok(lazy(move || {
            let resolved = ResolvedWildcard::resolve(&command, &context)?;
            if resolved.values.is_empty() {
                return Ok(once(missing_wildcard(&command, &context)));
            }

            let values = resolved.commands()?;
            let context = resolved.context;
            let mut results = Vec::new();
            for value in &values {
                let mut stream = context.generator_from_command(value)?;
                if context.is_finite(value) {
                    results.extend(stream);
                } else if let Some(result) = stream.next() {
                    results.push(result);
                }
            }
            Ok(Box::new(results.into_iter()))
        }))
    }

    fn wrap(&self, command: &WrapCommand, context: &SamplingContext) -> Result<ResultStream> {
        let command = command.clone();
        let context = context.clone();
        Ok(lazy(move || {
            let slots = vec![
                Slot::for_command(&context, &command.wrapper)?,
                Slot::for_command(&context, &command.inner)?,
            ];
            let mut joiner = WrapJoiner::default();
            Ok(Box::new(Product::new(slots).map(move |parts| {
                parts.map(|p| joiner.join(&p[0], &p[1]))
            })))
        }))
    }
}

/// Distinct renderings of `command` in combinatorial order.
pub(super) fn variant_combinations(context: SamplingContext, command: &VariantCommand) -> ResultStream {
    Box::new(VariantProduct::new(context, command))
}

/// Every arrangement of `min..=max` distinct options, each expanded as the
/// product of the chosen options' renderings. Repeated prompts are dropped.
struct VariantProduct {
    context: SamplingContext,
    options: Vec<Command>,
    slots: Vec<Option<Slot>>,
    arrangements: Box<dyn Iterator<Item = Vec<usize>>>,
    product: Option<Product>,
    separator: String,
    seen: HashSet<String>,
    done: bool,
}

impl VariantProduct {
    fn new(context: SamplingContext, command: &VariantCommand) -> Self {
        let options: Vec<Command> = command.values().cloned().collect();
        Self {
            arrangements: Box::new(arrangements_between(
                options.len(),
                command.effective_min_bound(),
                command.effective_max_bound(),
            )),
            slots: vec![None; options.len()],
            options,
            context,
            product: None,
            separator: command.separator.clone(),
            seen: HashSet::new(),
            done: false,
        }
    }

    /// Renderings of option `index`, expanded on first use.
    fn slot(&mut self, index: usize) -> Result<Slot> {
        if let Some(slot) = &self.slots[index] {
            return Ok(slot.clone());
        }
        let slot = Slot::for_command(&self.context, &self.options[index])?;
        self.slots[index] = Some(slot.clone());
        Ok(slot)
    }
}

impl Iterator for VariantProduct {
    type Item = Result<SamplingResult>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            if let Some(product) = &mut self.product {
                match product.next() {
                    Some(Ok(parts)) => {
                        let result = SamplingResult::joined(&parts, &self.separator);
                        if self.seen.insert(result.dedupe_key().to_string()) {
                            return Some(Ok(result));
                        }
                        continue;
                    }
                    Some(Err(e)) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                    None => self.product = None,
                }
            }

            let Some(arrangement) = self.arrangements.next() else {
                self.done = true;
                break;
            };
            let slots: Result<Vec<Slot>> = arrangement.into_iter().map(|i| self.slot(i)).collect();
            match slots {
                Ok(slots) => self.product = Some(Product::new(slots)),
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}
