//! Command tree produced by the parser and consumed by the samplers.
//!
//! A template such as `A {red|blue} __shapes__` parses into a
//! [`Command::Sequence`] of a literal, a variant and a wildcard. Every node
//! carries an optional [`SamplingMethod`] that overrides the strategy of the
//! context it is sampled in.

mod method;
mod types;


pub use method::SamplingMethod;
pub use types::{
    Command, DEFAULT_VARIANT_SEPARATOR, LiteralCommand, SequenceCommand, VariableAccessCommand,
    VariableAssignmentCommand, VariantCommand, VariantOption, WildcardCommand, WrapCommand,
};
