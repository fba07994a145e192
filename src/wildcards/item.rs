//! Single wildcard entries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of a wildcard collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WildcardItem {
    /// Plain text with the default weight of 1.0.
    Plain(String),
    /// Text with an explicit weight.
    Weighted { content: String, weight: f64 },
}

impl WildcardItem {
    pub fn plain(content: impl Into<String>) -> Self {
        WildcardItem::Plain(content.into())
    }

    /// Create a weighted item. Negative and NaN weights become 0.
    pub fn weighted(content: impl Into<String>, weight: f64) -> Self {
        let weight = if weight.is_nan() { 0.0 } else { weight.max(0.0) };
        WildcardItem::Weighted {
            content: content.into(),
            weight,
        }
    }

    /// Parse an entry, honouring the `weight::content` shorthand.
    ///
    /// ```
    /// use wildprompt::wildcards::WildcardItem;
    ///
    /// assert_eq!(WildcardItem::parse("2.5::red"), WildcardItem::weighted("red", 2.5));
    /// assert_eq!(WildcardItem::parse("{2::a|b}"), WildcardItem::plain("{2::a|b}"));
    /// ```
    pub fn parse(text: &str) -> Self {
        if let Some((weight, content)) = text.split_once("::") {
            let weight = weight.trim();
            let numeric = !weight.is_empty()
                && weight.chars().all(|c| c.is_ascii_digit() || c == '.')
                && weight.chars().any(|c| c.is_ascii_digit());
            if numeric {
                if let Ok(w) = weight.parse::<f64>() {
                    return Self::weighted(content.trim_start(), w);
                }
            }
        }
        Self::plain(text)
    }

    pub fn content(&self) -> &str {
        match self {
            WildcardItem::Plain(s) => s,
            WildcardItem::Weighted { content, .. } => content,
        }
    }

    pub fn weight(&self) -> f64 {
        match self {
            WildcardItem::Plain(_) => 1.0,
            WildcardItem::Weighted { weight, .. } => *weight,
        }
    }
}

impl fmt::Display for WildcardItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.content())
    }
}

impl From<&str> for WildcardItem {
    fn from(s: &str) -> Self {
        WildcardItem::plain(s)
    }
}

impl From<String> for WildcardItem {
    fn from(s: String) -> Self {
        WildcardItem::Plain(s)
    }
}
