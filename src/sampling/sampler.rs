//! The sampler trait and helpers shared by its implementations.

use super::combinatorial::CombinatorialSampler;
use super::context::SamplingContext;
use super::cyclical::CyclicalSampler;
use super::random::RandomSampler;
use super::result::SamplingResult;
use super::stream::ResultStream;
use crate::commands::{
    Command, LiteralCommand, SamplingMethod, SequenceCommand, VariantCommand, VariantOption,
    WildcardCommand, WrapCommand,
};
use crate::error::Result;
use crate::utils::{split_at_wrap_marker, substitute_variables};
use crate::wildcards::WildcardValues;

/// Expands commands into result streams for one sampling method.
///
/// Variable accesses and assignments are handled by the context itself; the
/// remaining command kinds each have a method here.
pub trait Sampler {
    fn literal(&self, command: &LiteralCommand, context: &SamplingContext) -> Result<ResultStream>;

    fn sequence(&self, command: &SequenceCommand, context: &SamplingContext) -> Result<ResultStream>;

    fn variant(&self, command: &VariantCommand, context: &SamplingContext) -> Result<ResultStream>;

    fn wildcard(&self, command: &WildcardCommand, context: &SamplingContext) -> Result<ResultStream>;

    fn wrap(&self, command: &WrapCommand, context: &SamplingContext) -> Result<ResultStream>;
}

/// The sampler implementing `method`.
pub fn sampler_for(method: SamplingMethod) -> &'static dyn Sampler {
    match method {
        SamplingMethod::Random => &RandomSampler,
        SamplingMethod::Combinatorial => &CombinatorialSampler,
        SamplingMethod::Cyclical => &CyclicalSampler,
    }
}

// ============================================================================
// Wildcards
// ============================================================================

/// A wildcard after variable substitution and argument binding.
pub(crate) struct ResolvedWildcard {
    /// Context with the wildcard's arguments bound.
    pub context: SamplingContext,
    pub values: WildcardValues,
}

impl ResolvedWildcard {
    /// Substitute `${var}` references in the pattern, bind the `(k=v)`
    /// arguments and look the pattern up.
    pub(crate) fn resolve(command: &WildcardCommand, context: &SamplingContext) -> Result<Self> {
        let config = context.parser_config();
        let pattern = substitute_variables(
            &command.wildcard,
            &config.variable_start,
            &config.variable_end,
            |name, default| context.variable_text(name, default),
        )?;
        let bound = context.with_immediate_bindings(&command.variables)?;
        let values = context.wildcard_manager().get_values(&pattern);
        Ok(Self {
            context: bound,
            values,
        })
    }

    /// Parse every value as a template.
    pub(crate) fn commands(&self) -> Result<Vec<Command>> {
        self.values
            .iter()
            .map(|item| self.context.parse(item.content()))
            .collect()
    }
}

/// The text emitted for a wildcard that matched nothing: the token itself.
pub(crate) fn missing_wildcard(command: &WildcardCommand, context: &SamplingContext) -> SamplingResult {
    let token = context.wildcard_manager().to_wildcard(&command.wildcard);
    tracing::warn!("No values found for wildcard '{}'", token);
    SamplingResult::new(token)
}

/// Rewrite `{__pattern__}` into a variant over the pattern's values.
///
/// Bounds, separator and method are kept; each value becomes an option
/// weighted by its entry weight. Other variants, and wildcards with no
/// values, are returned unchanged.
pub(crate) fn expand_single_wildcard(
    command: &VariantCommand,
    context: &SamplingContext,
) -> Result<(SamplingContext, VariantCommand)> {
    let Some(wildcard) = command.single_wildcard() else {
        return Ok((context.clone(), command.clone()));
    };
    let resolved = ResolvedWildcard::resolve(wildcard, context)?;
    if resolved.values.is_empty() {
        return Ok((context.clone(), command.clone()));
    }

    let options = resolved
        .commands()?
        .into_iter()
        .zip(resolved.values.weights())
        .map(|(value, weight)| VariantOption::new(value, weight))
        .collect();
    let expanded = VariantCommand {
        options,
        ..command.clone()
    };
    Ok((resolved.context, expanded))
}

// ============================================================================
// Wrap
// ============================================================================

/// Places inner renderings inside a wrapper rendering.
#[derive(Debug, Default)]
pub(crate) struct WrapJoiner {
    warned: bool,
}

impl WrapJoiner {
    /// `prefix + inner + suffix`, split at the wrapper's first wrap marker.
    /// Without a marker the whole wrapper is the prefix.
    pub(crate) fn join(&mut self, wrapper: &SamplingResult, inner: &SamplingResult) -> SamplingResult {
        let (prefix, suffix) = match split_at_wrap_marker(&wrapper.text) {
            Some(parts) => parts,
            None => {
                if !self.warned {
                    tracing::warn!(
                        "Wrap command '{}' has no wrap marker; appending the inner text",
                        wrapper.text
                    );
                    self.warned = true;
                }
                (wrapper.text.as_str(), "")
            }
        };
        let text = format!("{}{}{}", prefix, inner.text, suffix);
        let mut joined = SamplingResult::joined(&[wrapper.clone(), inner.clone()], "");
        joined.text = text;
        joined
    }
}
