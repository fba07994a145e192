//! Error types for wildprompt.
//!
//! Uses thiserror for derive macros. Parse errors carry their own location
//! information (see [`crate::parser::ParseError`]); sampling errors name the
//! variable that caused them.

use crate::parser::ParseError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for wildprompt operations.
#[derive(Error, Debug)]
pub enum PromptError {
    /// The template could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A variable was accessed that has no binding, no default, and the
    /// context has no `unknown_variable_value`.
    #[error("unknown variable '{name}'")]
    UnknownVariable {
        /// Name of the variable.
        name: String,
    },

    /// A variable refers to itself, directly or transitively.
    #[error("recursive variable reference: '{name}' is already being sampled")]
    RecursiveVariable {
        /// Name of the variable that was entered twice.
        name: String,
    },

    /// Invalid configuration value.
    #[error("{0}")]
    Config(String),

    /// A configuration file could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl PromptError {
    pub(crate) fn unknown_variable(name: impl Into<String>) -> Self {
        PromptError::UnknownVariable { name: name.into() }
    }

    pub(crate) fn recursive_variable(name: impl Into<String>) -> Self {
        PromptError::RecursiveVariable { name: name.into() }
    }
}

/// Result type alias for wildprompt operations.
pub type Result<T> = std::result::Result<T, PromptError>;
