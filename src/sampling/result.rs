//! Sampler output values.

use serde_json::{Map, Value};
use std::fmt;

/// One rendered prompt, or a fragment of one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SamplingResult {
    pub text: String,
    pub metadata: Option<Map<String, Value>>,
}

impl SamplingResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: None,
        }
    }

    /// Attach one metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata
            .get_or_insert_with(Map::new)
            .insert(key.into(), value);
        self
    }

    /// Identity used to suppress duplicates in combinatorial output.
    pub fn dedupe_key(&self) -> &str {
        &self.text
    }

    /// Join results with `separator`.
    ///
    /// When more than one result is joined with a non-empty separator,
    /// leading and trailing copies of the separator are removed, so empty
    /// fragments do not leave dangling separators. Metadata maps are merged,
    /// later entries winning.
    ///
    /// ```
    /// use wildprompt::sampling::SamplingResult;
    ///
    /// let parts = [SamplingResult::new(""), SamplingResult::new("b")];
    /// assert_eq!(SamplingResult::joined(&parts, ",").text, "b");
    /// ```
    pub fn joined(results: &[SamplingResult], separator: &str) -> SamplingResult {
        if let [single] = results {
            return single.clone();
        }

        let text = results
            .iter()
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join(separator);
        let text = if separator.is_empty() {
            text
        } else {
            text.trim_start_matches(separator)
                .trim_end_matches(separator)
                .to_string()
        };

        let mut metadata: Option<Map<String, Value>> = None;
        for map in results.iter().filter_map(|r| r.metadata.as_ref()) {
            metadata
                .get_or_insert_with(Map::new)
                .extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        SamplingResult { text, metadata }
    }

    /// Apply `f` to the text, keeping the metadata.
    pub fn map_text(self, f: impl FnOnce(&str) -> String) -> Self {
        Self {
            text: f(&self.text),
            metadata: self.metadata,
        }
    }
}

impl fmt::Display for SamplingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for SamplingResult {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for SamplingResult {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn results(texts: &[&str]) -> Vec<SamplingResult> {
        texts.iter().map(|t| SamplingResult::new(*t)).collect()
    }

    #[test]
    fn test_joined_plain() {
        assert_eq!(SamplingResult::joined(&results(&["a", "b"]), ", ").text, "a, b");
        assert_eq!(SamplingResult::joined(&results(&[]), ",").text, "");
    }

    #[test]
    fn test_joined_strips_dangling_separators() {
        assert_eq!(SamplingResult::joined(&results(&["", "a", ""]), ",").text, "a");
        assert_eq!(SamplingResult::joined(&results(&["a", ""]), " and ").text, "a");
    }

    #[test]
    fn test_single_result_is_passed_through() {
        assert_eq!(SamplingResult::joined(&results(&[",a,"]), ",").text, ",a,");
    }

    #[test]
    fn test_joined_merges_metadata() {
        let a = SamplingResult::new("a").with_metadata("k", json!(1));
        let b = SamplingResult::new("b").with_metadata("k", json!(2));
        let joined = SamplingResult::joined(&[a, b], " ");
        assert_eq!(joined.metadata.unwrap().get("k"), Some(&json!(2)));
    }

    #[test]
    fn test_dedupe_key_is_text() {
        let r = SamplingResult::new("x").with_metadata("source", json!("a"));
        assert_eq!(r.dedupe_key(), "x");
    }
}
