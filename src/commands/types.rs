//! Command tree node definitions.

use super::method::SamplingMethod;

/// A node of a parsed template.
///
/// Commands form an immutable tree. Samplers dispatch on the variant tag;
/// there is no open extension point.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Literal(LiteralCommand),
    Sequence(SequenceCommand),
    Variant(VariantCommand),
    Wildcard(WildcardCommand),
    Wrap(WrapCommand),
    VariableAssignment(VariableAssignmentCommand),
    VariableAccess(VariableAccessCommand),
}

impl Command {
    /// Create a literal command.
    pub fn literal(text: impl Into<String>) -> Self {
        Command::Literal(LiteralCommand::new(text))
    }

    /// Create a wildcard command for the given pattern.
    pub fn wildcard(pattern: impl Into<String>) -> Self {
        Command::Wildcard(WildcardCommand::new(pattern))
    }

    /// Create a variable access without a default.
    pub fn variable(name: impl Into<String>) -> Self {
        Command::VariableAccess(VariableAccessCommand::new(name, None))
    }

    /// Create a sequence from the given tokens with an empty separator.
    pub fn sequence(tokens: Vec<Command>) -> Self {
        Command::Sequence(SequenceCommand::new(tokens))
    }

    /// Explicit sampling method of this node, if any.
    pub fn sampling_method(&self) -> Option<SamplingMethod> {
        match self {
            Command::Literal(c) => c.sampling_method,
            Command::Sequence(c) => c.sampling_method,
            Command::Variant(c) => c.sampling_method,
            Command::Wildcard(c) => c.sampling_method,
            Command::Wrap(c) => c.sampling_method,
            Command::VariableAssignment(c) => c.sampling_method,
            Command::VariableAccess(c) => c.sampling_method,
        }
    }

    /// Return a copy of this node with the sampling method replaced.
    pub fn with_sampling_method(mut self, method: Option<SamplingMethod>) -> Self {
        match &mut self {
            Command::Literal(c) => c.sampling_method = method,
            Command::Sequence(c) => c.sampling_method = method,
            Command::Variant(c) => c.sampling_method = method,
            Command::Wildcard(c) => c.sampling_method = method,
            Command::Wrap(c) => c.sampling_method = method,
            Command::VariableAssignment(c) => c.sampling_method = method,
            Command::VariableAccess(c) => c.sampling_method = method,
        }
        self
    }

    /// The literal text if this is a literal command.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Command::Literal(c) => Some(&c.literal),
            _ => None,
        }
    }

    /// Whether this is a wildcard command.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Command::Wildcard(_))
    }
}

impl From<LiteralCommand> for Command {
    fn from(c: LiteralCommand) -> Self {
        Command::Literal(c)
    }
}

impl From<SequenceCommand> for Command {
    fn from(c: SequenceCommand) -> Self {
        Command::Sequence(c)
    }
}

impl From<VariantCommand> for Command {
    fn from(c: VariantCommand) -> Self {
        Command::Variant(c)
    }
}

impl From<WildcardCommand> for Command {
    fn from(c: WildcardCommand) -> Self {
        Command::Wildcard(c)
    }
}

impl From<WrapCommand> for Command {
    fn from(c: WrapCommand) -> Self {
        Command::Wrap(c)
    }
}

impl From<VariableAssignmentCommand> for Command {
    fn from(c: VariableAssignmentCommand) -> Self {
        Command::VariableAssignment(c)
    }
}

impl From<VariableAccessCommand> for Command {
    fn from(c: VariableAccessCommand) -> Self {
        Command::VariableAccess(c)
    }
}

/// Plain text.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralCommand {
    pub literal: String,
    pub sampling_method: Option<SamplingMethod>,
}

impl LiteralCommand {
    pub fn new(literal: impl Into<String>) -> Self {
        Self {
            literal: literal.into(),
            sampling_method: None,
        }
    }
}

/// Ordered list of commands whose renderings are joined by `separator`.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceCommand {
    pub tokens: Vec<Command>,
    pub separator: String,
    pub sampling_method: Option<SamplingMethod>,
}

impl SequenceCommand {
    pub fn new(tokens: Vec<Command>) -> Self {
        Self {
            tokens,
            separator: String::new(),
            sampling_method: None,
        }
    }

    /// Build a sequence of literal commands.
    pub fn from_literals<I, S>(literals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(literals.into_iter().map(Command::literal).collect())
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

/// One alternative of a variant.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantOption {
    pub value: Command,
    pub weight: f64,
}

impl VariantOption {
    /// Create an option. Negative and NaN weights become 0.
    pub fn new(value: Command, weight: f64) -> Self {
        let weight = if weight.is_nan() { 0.0 } else { weight.max(0.0) };
        Self { value, weight }
    }
}

impl From<Command> for VariantOption {
    fn from(value: Command) -> Self {
        Self::new(value, 1.0)
    }
}

/// `{a|b|c}` alternation.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantCommand {
    pub options: Vec<VariantOption>,
    pub min_bound: usize,
    pub max_bound: usize,
    pub separator: String,
    pub sampling_method: Option<SamplingMethod>,
}

/// Separator used between multiple picked variant options.
pub const DEFAULT_VARIANT_SEPARATOR: &str = ",";

impl VariantCommand {
    /// Create a variant. The bounds are reordered if given reversed.
    pub fn new(
        options: Vec<VariantOption>,
        min_bound: i64,
        max_bound: i64,
        separator: impl Into<String>,
    ) -> Self {
        let (lo, hi) = if min_bound <= max_bound {
            (min_bound, max_bound)
        } else {
            (max_bound, min_bound)
        };
        let min_bound = lo.max(0) as usize;
        let max_bound = (hi.max(0) as usize).max(min_bound);
        Self {
            options,
            min_bound,
            max_bound,
            separator: separator.into(),
            sampling_method: None,
        }
    }

    /// A single-pick variant over literal options with unit weights.
    pub fn from_literals<I, S>(literals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options = literals
            .into_iter()
            .map(|l| VariantOption::from(Command::literal(l)))
            .collect();
        Self::new(options, 1, 1, DEFAULT_VARIANT_SEPARATOR)
    }

    /// A single-pick variant over literal options with explicit weights.
    ///
    /// Missing weights default to 1.0.
    pub fn from_literals_and_weights<I, S>(literals: I, weights: &[f64]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options = literals
            .into_iter()
            .enumerate()
            .map(|(i, l)| {
                let weight = weights.get(i).copied().unwrap_or(1.0);
                VariantOption::new(Command::literal(l), weight)
            })
            .collect();
        Self::new(options, 1, 1, DEFAULT_VARIANT_SEPARATOR)
    }

    pub fn with_sampling_method(mut self, method: Option<SamplingMethod>) -> Self {
        self.sampling_method = method;
        self
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn weights(&self) -> Vec<f64> {
        self.options.iter().map(|o| o.weight).collect()
    }

    pub fn values(&self) -> impl Iterator<Item = &Command> {
        self.options.iter().map(|o| &o.value)
    }

    /// Upper bound clamped to the number of options.
    pub fn effective_max_bound(&self) -> usize {
        self.max_bound.min(self.options.len())
    }

    /// Lower bound clamped to the effective upper bound.
    pub fn effective_min_bound(&self) -> usize {
        self.min_bound.min(self.effective_max_bound())
    }

    /// The wildcard this variant wraps, if its only option is a wildcard.
    pub fn single_wildcard(&self) -> Option<&WildcardCommand> {
        match self.options.as_slice() {
            [VariantOption {
                value: Command::Wildcard(w),
                ..
            }] => Some(w),
            _ => None,
        }
    }
}

/// `__pattern__` reference to a wildcard collection.
#[derive(Debug, Clone, PartialEq)]
pub struct WildcardCommand {
    /// Glob pattern; may contain `${var}` references.
    pub wildcard: String,
    /// Immediate bindings from the `__name(var=value)__` syntax.
    pub variables: Vec<(String, Command)>,
    pub sampling_method: Option<SamplingMethod>,
}

impl WildcardCommand {
    pub fn new(wildcard: impl Into<String>) -> Self {
        Self {
            wildcard: wildcard.into(),
            variables: Vec::new(),
            sampling_method: None,
        }
    }

    pub fn with_variables(mut self, variables: Vec<(String, Command)>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_sampling_method(mut self, method: Option<SamplingMethod>) -> Self {
        self.sampling_method = method;
        self
    }
}

/// `%{wrapper$$inner}`: inner renderings are placed inside the wrapper.
#[derive(Debug, Clone, PartialEq)]
pub struct WrapCommand {
    pub wrapper: Box<Command>,
    pub inner: Box<Command>,
    pub sampling_method: Option<SamplingMethod>,
}

impl WrapCommand {
    pub fn new(wrapper: Command, inner: Command) -> Self {
        Self {
            wrapper: Box::new(wrapper),
            inner: Box::new(inner),
            sampling_method: None,
        }
    }
}

/// `${name=value}` (deferred) or `${name=!value}` (immediate).
#[derive(Debug, Clone, PartialEq)]
pub struct VariableAssignmentCommand {
    pub name: String,
    pub value: Box<Command>,
    pub immediate: bool,
    pub sampling_method: Option<SamplingMethod>,
}

impl VariableAssignmentCommand {
    pub fn new(name: impl Into<String>, value: Command, immediate: bool) -> Self {
        Self {
            name: name.into(),
            value: Box::new(value),
            immediate,
            sampling_method: None,
        }
    }
}

/// `${name}` or `${name:default}`.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableAccessCommand {
    pub name: String,
    pub default: Option<Box<Command>>,
    pub sampling_method: Option<SamplingMethod>,
}

impl VariableAccessCommand {
    pub fn new(name: impl Into<String>, default: Option<Command>) -> Self {
        Self {
            name: name.into(),
            default: default.map(Box::new),
            sampling_method: None,
        }
    }
}
