//! Parsing of wildcard sources: text files and structured (JSON/YAML) data.

use super::item::WildcardItem;
use serde_json::Value;
use std::path::Path;

/// Kind of wildcard source, by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Text,
    Json,
    Yaml,
}

impl SourceFormat {
    /// Detect the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Parse the lines of a text wildcard file.
///
/// Blank lines and lines starting with `#` are skipped; the rest are trimmed
/// and may use the `weight::content` shorthand.
pub fn parse_text_entries(content: &str) -> Vec<WildcardItem> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(WildcardItem::parse)
        .collect()
}

/// Parse structured file content into a JSON value tree.
pub fn parse_structured(content: &str, format: SourceFormat) -> Result<Value, String> {
    match format {
        SourceFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        SourceFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        SourceFormat::Text => Ok(Value::Array(
            parse_text_entries(content)
                .into_iter()
                .map(|item| Value::String(item.content().to_string()))
                .collect(),
        )),
    }
}

/// Convert one list element into an entry. Returns `None` for shapes that
/// cannot be an entry.
pub fn entry_from_value(value: &Value) -> Option<WildcardItem> {
    match value {
        Value::String(s) => Some(WildcardItem::parse(s)),
        Value::Number(n) => Some(WildcardItem::plain(n.to_string())),
        Value::Bool(b) => Some(WildcardItem::plain(b.to_string())),
        Value::Object(map) => {
            let content = map.get("content")?.as_str()?;
            match map.get("weight") {
                None => Some(WildcardItem::plain(content)),
                Some(w) => Some(WildcardItem::weighted(content, w.as_f64()?)),
            }
        }
        Value::Null | Value::Array(_) => None,
    }
}

/// Convert a list into entries, logging and skipping unsupported elements.
pub fn entries_from_list(list: &[Value], source: &str) -> Vec<WildcardItem> {
    list.iter()
        .filter_map(|value| {
            let entry = entry_from_value(value);
            if entry.is_none() {
                tracing::warn!(
                    "Skipping unsupported wildcard entry {} in '{}'",
                    value,
                    source
                );
            }
            entry
        })
        .collect()
}

/// Flatten a structured value into `(collection_path, entries)` pairs.
///
/// A list at the top becomes a single collection named `prefix`. A map
/// contributes one collection per leaf list, named by the key path appended
/// to `parent`.
pub fn flatten_structured(
    value: &Value,
    prefix: &str,
    parent: &str,
    source: &str,
) -> Vec<(String, Vec<WildcardItem>)> {
    let mut out = Vec::new();
    match value {
        Value::Array(list) => out.push((prefix.to_string(), entries_from_list(list, source))),
        Value::Object(_) => collect_map_leaves(value, parent, source, &mut out),
        other => tracing::warn!(
            "Skipping wildcard source '{}': expected a list or a map, found {}",
            source,
            value_kind(other)
        ),
    }
    out
}

fn collect_map_leaves(
    value: &Value,
    path: &str,
    source: &str,
    out: &mut Vec<(String, Vec<WildcardItem>)>,
) {
    let Value::Object(map) = value else {
        return;
    };
    for (key, child) in map {
        let child_path = join_name(path, key);
        match child {
            Value::Array(list) => out.push((child_path, entries_from_list(list, source))),
            Value::Object(_) => collect_map_leaves(child, &child_path, source, out),
            other => tracing::warn!(
                "Skipping '{}' in '{}': expected a list or a map, found {}",
                child_path,
                source,
                value_kind(other)
            ),
        }
    }
}

/// Join two `/`-separated name parts, ignoring empty ones.
pub fn join_name(parent: &str, name: &str) -> String {
    let name = name.trim_matches('/');
    if parent.is_empty() {
        name.to_string()
    } else if name.is_empty() {
        parent.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a map",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_entries_skip_blank_and_comments() {
        let entries = parse_text_entries("red\n\n  # comment\n  green  \n3::blue\n");
        assert_eq!(
            entries,
            vec![
                WildcardItem::plain("red"),
                WildcardItem::plain("green"),
                WildcardItem::weighted("blue", 3.0),
            ]
        );
    }

    #[test]
    fn test_entry_from_value_shapes() {
        assert_eq!(entry_from_value(&json!("x")), Some(WildcardItem::plain("x")));
        assert_eq!(entry_from_value(&json!(5)), Some(WildcardItem::plain("5")));
        assert_eq!(
            entry_from_value(&json!({"content": "x", "weight": 2})),
            Some(WildcardItem::weighted("x", 2.0))
        );
        assert_eq!(
            entry_from_value(&json!({"content": "x"})),
            Some(WildcardItem::plain("x"))
        );
        assert_eq!(entry_from_value(&json!({"weight": 2})), None);
        assert_eq!(entry_from_value(&json!(["nested"])), None);
        assert_eq!(entry_from_value(&json!(null)), None);
    }

    #[test]
    fn test_flatten_flat_list() {
        let out = flatten_structured(&json!(["a", "b"]), "dir/colors", "dir", "colors.json");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].0, "dir/colors");
        assert_eq!(out[0].1.len(), 2);
    }

    #[test]
    fn test_flatten_nested_map() {
        let value = json!({
            "animals": {
                "mammals": ["cat", "dog"],
                "birds": ["owl"]
            },
            "colors": ["red"],
            "ignored": "scalar"
        });
        let out = flatten_structured(&value, "dir/file", "dir", "file.yaml");
        let names: Vec<&str> = out.iter().map(|(n, _)| n.as_str()).collect();
        assert!(names.contains(&"dir/animals/mammals"));
        assert!(names.contains(&"dir/animals/birds"));
        assert!(names.contains(&"dir/colors"));
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_flatten_scalar_is_skipped() {
        assert!(flatten_structured(&json!("nope"), "x", "", "x.json").is_empty());
    }

    #[test]
    fn test_yaml_parses_into_value() {
        let value = parse_structured("colors:\n  - red\n  - 2::blue\n", SourceFormat::Yaml).unwrap();
        assert_eq!(value, json!({"colors": ["red", "2::blue"]}));
    }

    #[test]
    fn test_source_format_from_path() {
        assert_eq!(SourceFormat::from_path(Path::new("a/b.TXT")), Some(SourceFormat::Text));
        assert_eq!(SourceFormat::from_path(Path::new("a/b.yml")), Some(SourceFormat::Yaml));
        assert_eq!(SourceFormat::from_path(Path::new("a/b.json")), Some(SourceFormat::Json));
        assert_eq!(SourceFormat::from_path(Path::new("a/b.md")), None);
        assert_eq!(SourceFormat::from_path(Path::new("a/b")), None);
    }

    #[test]
    fn test_join_name() {
        assert_eq!(join_name("", "a"), "a");
        assert_eq!(join_name("a", "b"), "a/b");
        assert_eq!(join_name("a", ""), "a");
        assert_eq!(join_name("a", "/b/"), "a/b");
    }
}
