//! Small text helpers shared by the samplers.

mod variables;
mod whitespace;
mod wrap;

pub use variables::substitute_variables;
pub use whitespace::squash_whitespace;
pub use wrap::{WRAP_MARKER, split_at_wrap_marker};
