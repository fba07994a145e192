//! Delimiters recognised by the parser.

use serde::{Deserialize, Serialize};

pub(crate) fn default_variant_start() -> String {
    "{".to_string()
}
pub(crate) fn default_variant_end() -> String {
    "}".to_string()
}
pub(crate) fn default_wildcard_wrap() -> String {
    "__".to_string()
}
pub(crate) fn default_variable_start() -> String {
    "${".to_string()
}
pub(crate) fn default_variable_end() -> String {
    "}".to_string()
}

/// Delimiters used by the template language.
///
/// Every field has a default, so a partial YAML mapping is enough:
///
/// ```yaml
/// variant_start: "<"
/// variant_end: ">"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Opens a variant (default `{`).
    #[serde(default = "default_variant_start")]
    pub variant_start: String,

    /// Closes a variant or wrap command (default `}`).
    #[serde(default = "default_variant_end")]
    pub variant_end: String,

    /// Surrounds a wildcard name (default `__`).
    #[serde(default = "default_wildcard_wrap")]
    pub wildcard_wrap: String,

    /// Opens a variable assignment or access (default `${`).
    #[serde(default = "default_variable_start")]
    pub variable_start: String,

    /// Closes a variable assignment or access (default `}`).
    #[serde(default = "default_variable_end")]
    pub variable_end: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            variant_start: default_variant_start(),
            variant_end: default_variant_end(),
            wildcard_wrap: default_wildcard_wrap(),
            variable_start: default_variable_start(),
            variable_end: default_variable_end(),
        }
    }
}

impl ParserConfig {
    /// Surround `name` with the wildcard wrap, e.g. `colors` -> `__colors__`.
    pub fn wrap_wildcard(&self, name: &str) -> String {
        format!("{}{}{}", self.wildcard_wrap, name, self.wildcard_wrap)
    }

    /// The wrap-command opener, `%` followed by the variant start.
    pub(crate) fn wrap_start(&self) -> String {
        format!("%{}", self.variant_start)
    }

    /// Names of delimiters that are empty.
    pub(crate) fn empty_delimiters(&self) -> Vec<&'static str> {
        let mut empty = Vec::new();
        if self.variant_start.is_empty() {
            empty.push("variant_start");
        }
        if self.variant_end.is_empty() {
            empty.push("variant_end");
        }
        if self.wildcard_wrap.is_empty() {
            empty.push("wildcard_wrap");
        }
        if self.variable_start.is_empty() {
            empty.push("variable_start");
        }
        if self.variable_end.is_empty() {
            empty.push("variable_end");
        }
        empty
    }
}
