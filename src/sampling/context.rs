//! Sampling context: the options and state of one sampling pipeline.

use super::sampler::sampler_for;
use super::stream::{ResultStream, dedupe};
use crate::commands::{Command, LiteralCommand, SamplingMethod, VariableAccessCommand};
use crate::config::Config;
use crate::error::{PromptError, Result};
use crate::parser::{self, ParserConfig};
use crate::utils::squash_whitespace;
use crate::wildcards::WildcardManager;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

/// Everything a sampler needs to expand a command.
///
/// Contexts are cheap to clone and never mutated in place: methods such as
/// [`with_variables`](Self::with_variables) return a new context. Clones
/// share the wildcard manager and the random number generator.
#[derive(Clone)]
pub struct SamplingContext {
    default_sampling_method: SamplingMethod,
    wildcard_manager: Rc<WildcardManager>,
    parser_config: ParserConfig,
    ignore_whitespace: bool,
    rng: Rc<RefCell<StdRng>>,
    variables: Rc<HashMap<String, Command>>,
    unknown_variable_value: Option<String>,
    sampling_variables: Rc<HashSet<String>>,
}

impl fmt::Debug for SamplingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SamplingContext")
            .field("default_sampling_method", &self.default_sampling_method)
            .field("wildcard_manager", &self.wildcard_manager)
            .field("parser_config", &self.parser_config)
            .field("ignore_whitespace", &self.ignore_whitespace)
            .field("variables", &self.variables.keys().collect::<Vec<_>>())
            .field("unknown_variable_value", &self.unknown_variable_value)
            .finish()
    }
}

impl Default for SamplingContext {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Template text or an already parsed command.
#[derive(Debug, Clone, Copy)]
pub enum PromptSource<'a> {
    Template(&'a str),
    Command(&'a Command),
}

impl<'a> From<&'a str> for PromptSource<'a> {
    fn from(template: &'a str) -> Self {
        PromptSource::Template(template)
    }
}

impl<'a> From<&'a String> for PromptSource<'a> {
    fn from(template: &'a String) -> Self {
        PromptSource::Template(template)
    }
}

impl<'a> From<&'a Command> for PromptSource<'a> {
    fn from(command: &'a Command) -> Self {
        PromptSource::Command(command)
    }
}

/// Rendered prompts, as returned by [`SamplingContext::sample_prompts`].
///
/// Random and cyclical streams are infinite unless a limit was given.
pub struct PromptStream {
    inner: Box<dyn Iterator<Item = Result<String>>>,
}

impl Iterator for PromptStream {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl fmt::Debug for PromptStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptStream").finish_non_exhaustive()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`SamplingContext`].
#[derive(Debug, Default)]
pub struct SamplingContextBuilder {
    default_sampling_method: SamplingMethod,
    wildcard_manager: Option<Rc<WildcardManager>>,
    parser_config: ParserConfig,
    ignore_whitespace: bool,
    seed: Option<u64>,
    rng: Option<StdRng>,
    variables: HashMap<String, Command>,
    unknown_variable_value: Option<String>,
}

impl SamplingContextBuilder {
    pub fn default_sampling_method(mut self, method: SamplingMethod) -> Self {
        self.default_sampling_method = method;
        self
    }

    pub fn wildcard_manager(mut self, manager: Rc<WildcardManager>) -> Self {
        self.wildcard_manager = Some(manager);
        self
    }

    pub fn parser_config(mut self, config: ParserConfig) -> Self {
        self.parser_config = config;
        self
    }

    /// Collapse whitespace runs in rendered prompts.
    pub fn ignore_whitespace(mut self, ignore: bool) -> Self {
        self.ignore_whitespace = ignore;
        self
    }

    /// Seed the random number generator. Ignored if [`rng`](Self::rng) is set.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn rng(mut self, rng: StdRng) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn variable(mut self, name: impl Into<String>, value: Command) -> Self {
        self.variables.insert(name.into(), value);
        self
    }

    /// Text used for variables that have no binding and no default.
    pub fn unknown_variable_value(mut self, value: impl Into<String>) -> Self {
        self.unknown_variable_value = Some(value.into());
        self
    }

    pub fn build(self) -> SamplingContext {
        let rng = match (self.rng, self.seed) {
            (Some(rng), _) => rng,
            (None, Some(seed)) => StdRng::seed_from_u64(seed),
            (None, None) => StdRng::from_os_rng(),
        };
        SamplingContext {
            default_sampling_method: self.default_sampling_method,
            wildcard_manager: self
                .wildcard_manager
                .unwrap_or_else(|| Rc::new(WildcardManager::empty())),
            parser_config: self.parser_config,
            ignore_whitespace: self.ignore_whitespace,
            rng: Rc::new(RefCell::new(rng)),
            variables: Rc::new(self.variables),
            unknown_variable_value: self.unknown_variable_value,
            sampling_variables: Rc::new(HashSet::new()),
        }
    }
}

// ============================================================================
// Context
// ============================================================================

impl SamplingContext {
    pub fn builder() -> SamplingContextBuilder {
        SamplingContextBuilder::default()
    }

    /// Build a context from loaded configuration.
    ///
    /// The wildcard manager reads `config.wildcards.path` (if set) and uses
    /// the parser's wildcard wrap.
    pub fn from_config(config: &Config) -> Self {
        let manager = WildcardManager::empty()
            .with_config(config.wildcards.clone())
            .with_wildcard_wrap(config.parser.wildcard_wrap.clone());

        let mut builder = Self::builder()
            .default_sampling_method(config.sampling.method)
            .wildcard_manager(Rc::new(manager))
            .parser_config(config.parser.clone())
            .ignore_whitespace(config.sampling.ignore_whitespace);
        if let Some(seed) = config.sampling.seed {
            builder = builder.seed(seed);
        }
        if let Some(value) = &config.sampling.unknown_variable_value {
            builder = builder.unknown_variable_value(value.clone());
        }
        builder.build()
    }

    pub fn default_sampling_method(&self) -> SamplingMethod {
        self.default_sampling_method
    }

    pub fn wildcard_manager(&self) -> &WildcardManager {
        &self.wildcard_manager
    }

    pub fn parser_config(&self) -> &ParserConfig {
        &self.parser_config
    }

    pub fn ignore_whitespace(&self) -> bool {
        self.ignore_whitespace
    }

    pub fn variables(&self) -> &HashMap<String, Command> {
        &self.variables
    }

    pub fn unknown_variable_value(&self) -> Option<&str> {
        self.unknown_variable_value.as_deref()
    }

    pub(crate) fn rng(&self) -> &RefCell<StdRng> {
        &self.rng
    }

    /// A copy of this context with a different default method.
    pub fn with_sampling_method(&self, method: SamplingMethod) -> Self {
        Self {
            default_sampling_method: method,
            ..self.clone()
        }
    }

    /// A copy of this context with `variables` bound on top of the current
    /// ones.
    pub fn with_variables<I>(&self, variables: I) -> Self
    where
        I: IntoIterator<Item = (String, Command)>,
    {
        let mut merged = (*self.variables).clone();
        merged.extend(variables);
        Self {
            variables: Rc::new(merged),
            ..self.clone()
        }
    }

    /// A context for sampling the value of variable `name`.
    ///
    /// # Returns
    ///
    /// * `Ok(SamplingContext)` - `name` is now marked as being sampled
    /// * `Err(PromptError::RecursiveVariable)` - `name` is already being sampled
    pub fn for_sampling_variable(&self, name: &str) -> Result<Self> {
        if self.sampling_variables.contains(name) {
            return Err(PromptError::recursive_variable(name));
        }
        let mut guard = (*self.sampling_variables).clone();
        guard.insert(name.to_string());
        Ok(Self {
            sampling_variables: Rc::new(guard),
            ..self.clone()
        })
    }

    /// Split variable assignments out of `tokens`.
    ///
    /// Immediate assignments (`${name=!value}`) are sampled once, here, and
    /// bound as literals; deferred ones bind the command itself. Each
    /// assignment sees the bindings made before it.
    ///
    /// # Returns
    ///
    /// The context with the new bindings and the remaining tokens.
    pub fn process_variable_assignments(&self, tokens: &[Command]) -> Result<(Self, Vec<Command>)> {
        let mut context = self.clone();
        let mut rest = Vec::with_capacity(tokens.len());
        for token in tokens {
            match token {
                Command::VariableAssignment(assignment) => {
                    let value = if assignment.immediate {
                        let text = context.sample_first(&assignment.value)?;
                        Command::literal(text)
                    } else {
                        (*assignment.value).clone()
                    };
                    context = context.with_variables([(assignment.name.clone(), value)]);
                }
                other => rest.push(other.clone()),
            }
        }
        Ok((context, rest))
    }

    /// Bind `(name, command)` pairs immediately, as wildcard arguments do.
    pub(crate) fn with_immediate_bindings(&self, bindings: &[(String, Command)]) -> Result<Self> {
        let mut context = self.clone();
        for (name, value) in bindings {
            let text = context.sample_first(value)?;
            context = context.with_variables([(name.clone(), Command::literal(text))]);
        }
        Ok(context)
    }

    /// The context a child command is sampled in.
    ///
    /// A child's own method applies, except that a finite (combinatorial)
    /// child of a non-finite parent is sampled with the parent's method.
    pub fn for_command(&self, command: &Command) -> Self {
        match command.sampling_method() {
            None => self.clone(),
            Some(method) if method == self.default_sampling_method => self.clone(),
            Some(method) if self.default_sampling_method.is_nonfinite() && method.is_finite() => {
                tracing::warn!(
                    "Cannot sample a {} command inside a {} one; using {}",
                    method,
                    self.default_sampling_method,
                    self.default_sampling_method
                );
                self.clone()
            }
            Some(method) => self.with_sampling_method(method),
        }
    }

    /// Whether the stream for `command` in this context terminates.
    ///
    /// Variable accesses are followed to the bound command (or default).
    pub fn is_finite(&self, command: &Command) -> bool {
        self.effective_method(command, &mut HashSet::new()).is_finite()
    }

    fn effective_method(&self, command: &Command, visited: &mut HashSet<String>) -> SamplingMethod {
        let method = match command.sampling_method() {
            Some(method) if !(self.default_sampling_method.is_nonfinite() && method.is_finite()) => method,
            _ => self.default_sampling_method,
        };
        let Command::VariableAccess(access) = command else {
            return method;
        };
        if !visited.insert(access.name.clone()) {
            return method;
        }
        let context = self.with_sampling_method(method);
        match (self.variables.get(&access.name), &access.default) {
            (Some(bound), _) => context.effective_method(bound, visited),
            (None, Some(default)) => context.effective_method(default, visited),
            (None, None) => method,
        }
    }

    /// Stream of results for `command`, dispatched on its effective method.
    pub fn generator_from_command(&self, command: &Command) -> Result<ResultStream> {
        let context = self.for_command(command);
        let sampler = sampler_for(context.default_sampling_method);
        match command {
            Command::Literal(c) => sampler.literal(c, &context),
            Command::Sequence(c) => sampler.sequence(c, &context),
            Command::Variant(c) => sampler.variant(c, &context),
            Command::Wildcard(c) => sampler.wildcard(c, &context),
            Command::Wrap(c) => sampler.wrap(c, &context),
            Command::VariableAccess(c) => context.variable_access(c),
            Command::VariableAssignment(_) => sampler.literal(&LiteralCommand::new(""), &context),
        }
    }

    fn variable_access(&self, access: &VariableAccessCommand) -> Result<ResultStream> {
        let context = self.for_sampling_variable(&access.name)?;
        if let Some(bound) = self.variables.get(&access.name) {
            return context.generator_from_command(bound);
        }
        if let Some(default) = &access.default {
            return context.generator_from_command(default);
        }
        match &self.unknown_variable_value {
            Some(value) => context.generator_from_command(&Command::literal(value.clone())),
            None => Err(PromptError::unknown_variable(&access.name)),
        }
    }

    /// Text of the first result for `command`, or `""` if it yields nothing.
    pub(crate) fn sample_first(&self, command: &Command) -> Result<String> {
        match self.generator_from_command(command)?.next() {
            Some(result) => Ok(result?.text),
            None => Ok(String::new()),
        }
    }

    /// Resolve a `${name[:default]}` reference found in a wildcard pattern.
    pub(crate) fn variable_text(&self, name: &str, default: Option<&str>) -> Result<String> {
        if let Some(bound) = self.variables.get(name) {
            return self.for_sampling_variable(name)?.sample_first(bound);
        }
        match (default, &self.unknown_variable_value) {
            (Some(default), _) => Ok(default.to_string()),
            (None, Some(value)) => Ok(value.clone()),
            (None, None) => Err(PromptError::unknown_variable(name)),
        }
    }

    /// Parse a template with this context's delimiters.
    pub fn parse(&self, template: &str) -> Result<Command> {
        parser::parse_with_config(template, &self.parser_config)
    }

    /// Sample raw results for `command`, at most `n` if given.
    ///
    /// A finite stream never repeats a dedupe key. In a combinatorial
    /// context a non-finite command (say `{~a|b}`) contributes a single
    /// pull, so the stream still ends.
    pub fn sample_command_results(&self, command: &Command, n: Option<usize>) -> Result<ResultStream> {
        let stream = self.generator_from_command(command)?;
        let stream = if self.is_finite(command) {
            dedupe(stream)
        } else if self.default_sampling_method.is_finite() {
            Box::new(stream.take(1))
        } else {
            stream
        };
        Ok(match n {
            Some(n) => Box::new(stream.take(n)),
            None => stream,
        })
    }

    /// Render prompts from a template or command.
    ///
    /// With `n = None` the stream ends only under a combinatorial default;
    /// random and cyclical streams need a limit or a consumer that stops.
    ///
    /// # Examples
    ///
    /// ```
    /// use wildprompt::commands::SamplingMethod;
    /// use wildprompt::sampling::SamplingContext;
    ///
    /// let context = SamplingContext::builder()
    ///     .default_sampling_method(SamplingMethod::Combinatorial)
    ///     .build();
    /// let prompts: Vec<String> = context
    ///     .sample_prompts("{A|B|C}", None)
    ///     .unwrap()
    ///     .collect::<Result<_, _>>()
    ///     .unwrap();
    /// assert_eq!(prompts, vec!["A", "B", "C"]);
    /// ```
    pub fn sample_prompts<'a>(
        &self,
        source: impl Into<PromptSource<'a>>,
        n: Option<usize>,
    ) -> Result<PromptStream> {
        let parsed;
        let command = match source.into() {
            PromptSource::Template(template) => {
                parsed = self.parse(template)?;
                &parsed
            }
            PromptSource::Command(command) => command,
        };

        let ignore_whitespace = self.ignore_whitespace;
        let results = self.sample_command_results(command, n)?;
        let prompts = results.map(move |result| {
            result.map(|r| {
                if ignore_whitespace {
                    squash_whitespace(&r.text)
                } else {
                    r.text
                }
            })
        });
        Ok(PromptStream {
            inner: Box::new(prompts),
        })
    }
}
