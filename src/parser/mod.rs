//! Template parser.
//!
//! Turns template text into a [`Command`] tree. The grammar, with the default
//! delimiters:
//!
//! ```text
//! A {red|green|blue} __shapes/*__ ${size=!{big|small}} %{in a … box$$${size}}
//! ```
//!
//! - `{a|b|c}` variants, with optional `~`/`@` method sigil, `N$$`, `N-M$$`
//!   bound expressions, custom separators (`{2$$ and $$a|b}`) and `w::`
//!   weights (`{2::a|b}`)
//! - `__name__` wildcards, with globs and `(var=value)` arguments
//! - `${name=value}`, `${name=!value}` assignments and `${name}`,
//!   `${name:default}` accesses
//! - `%{wrapper$$inner}` wrap commands
//! - `#`, `//` and `/* */` comments
//!
//! The parser is strict: malformed constructs are errors, never guesses.

mod config;
mod error;
mod grammar;

#[cfg(test)]
mod tests;

pub use config::ParserConfig;
pub use error::{ParseError, ParseErrorKind};

use crate::commands::Command;
use crate::error::Result;
use grammar::Parser;

/// Parse a template with the default delimiters.
///
/// # Examples
///
/// ```
/// use wildprompt::commands::Command;
/// use wildprompt::parser::parse;
///
/// let command = parse("I love bread").unwrap();
/// assert_eq!(command, Command::literal("I love bread"));
/// ```
pub fn parse(template: &str) -> Result<Command> {
    parse_with_config(template, &ParserConfig::default())
}

/// Parse a template with custom delimiters.
///
/// # Returns
///
/// * `Ok(Command)` - a `Sequence` for several top-level tokens, the sole
///   token otherwise, or an empty literal for empty input
/// * `Err(PromptError::Parse)` - malformed template
pub fn parse_with_config(template: &str, config: &ParserConfig) -> Result<Command> {
    Ok(Parser::new(template, config).parse()?)
}
