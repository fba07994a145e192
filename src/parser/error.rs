//! Parse errors with source locations.

use thiserror::Error;

/// What went wrong while parsing a template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("unterminated variant")]
    UnterminatedVariant,

    #[error("unterminated variable")]
    UnterminatedVariable,

    #[error("unterminated wrap command")]
    UnterminatedWrap,

    #[error("wrap command is missing the '$$' between wrapper and inner prompt")]
    MissingWrapSeparator,

    #[error("unterminated block comment")]
    UnterminatedComment,

    #[error("malformed bound expression '{0}'")]
    InvalidBoundExpression(String),

    #[error("'$' cannot be used as a variant separator")]
    DollarSeparator,

    #[error("unexpected '$' inside variant")]
    UnexpectedDollar,

    #[error("invalid variable name '{0}'")]
    InvalidVariableName(String),

    #[error("malformed wildcard arguments: {0}")]
    InvalidWildcardArguments(String),
}

/// A template parse failure.
///
/// `offset` is a byte offset into the template; `line` and `column` are
/// 1-based and count characters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at line {line}, column {column}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    /// Create an error at `offset` in `source`.
    pub fn new(kind: ParseErrorKind, source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;
        Self {
            kind,
            offset,
            line,
            column,
        }
    }
}
