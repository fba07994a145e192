//! Hierarchical store of wildcard collections.
//!
//! Collections are addressed by `/`-separated names. A directory such as
//!
//! ```text
//! wildcards/
//!   colors.txt
//!   animals/
//!     cats.txt
//!   styles.yaml        # { painting: [..], photo: { film: [..] } }
//! ```
//!
//! yields the collections `colors`, `animals/cats`, `painting` and
//! `photo/film`. Structured maps are rooted at the file's directory; a
//! structured flat list is named after the file.

use super::collection::WildcardCollection;
use super::item::WildcardItem;
use super::loader::{SourceFormat, flatten_structured, join_name, parse_structured};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use walkdir::WalkDir;

/// One level of the tree.
#[derive(Debug, Default)]
pub struct WildcardTreeNode {
    /// Collections at this level, keyed by their last name segment. Several
    /// sources may share a name; their entries are concatenated.
    pub collections: BTreeMap<String, Vec<WildcardCollection>>,
    pub children: BTreeMap<String, WildcardTreeNode>,
}

impl WildcardTreeNode {
    fn node_mut(&mut self, parts: &[&str]) -> &mut WildcardTreeNode {
        let mut node = self;
        for part in parts {
            node = node.children.entry(part.to_string()).or_default();
        }
        node
    }

    fn node(&self, parts: &[&str]) -> Option<&WildcardTreeNode> {
        let mut node = self;
        for part in parts {
            node = node.children.get(*part)?;
        }
        Some(node)
    }

    fn collect_names(&self, prefix: &str, out: &mut Vec<String>) {
        for name in self.collections.keys() {
            out.push(join_name(prefix, name));
        }
        for (name, child) in &self.children {
            child.collect_names(&join_name(prefix, name), out);
        }
    }
}

/// Root of the wildcard hierarchy.
#[derive(Debug, Default)]
pub struct WildcardTree {
    root: WildcardTreeNode,
}

impl WildcardTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from every supported file below `root`.
    ///
    /// Symlinks are followed. Unreadable entries and malformed structured
    /// files are logged and skipped. Text files are registered without being
    /// read.
    pub fn from_path(root: &Path) -> Self {
        let mut tree = Self::new();
        if !root.is_dir() {
            tracing::warn!(
                "Wildcard path '{}' is not a directory; no wildcards loaded",
                root.display()
            );
            return tree;
        }

        let walker = WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable wildcard entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Some(format) = SourceFormat::from_path(path) else {
                continue;
            };
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let name = collection_name_for(relative);
            if name.is_empty() {
                continue;
            }

            match format {
                SourceFormat::Text => tree.add_collection(&name, WildcardCollection::text_file(path)),
                SourceFormat::Json | SourceFormat::Yaml => {
                    tree.add_structured_file(path, &name, format)
                }
            }
        }

        tracing::debug!(
            "Loaded {} wildcard collections from '{}'",
            tree.collection_names().len(),
            root.display()
        );
        tree
    }

    /// Build a tree from a nested map whose leaf lists are collections.
    ///
    /// ```
    /// use serde_json::json;
    /// use wildprompt::wildcards::WildcardTree;
    ///
    /// let tree = WildcardTree::from_root_map(&json!({
    ///     "colors": ["red", "green"],
    ///     "animals": { "cats": ["tabby"] }
    /// }));
    /// assert_eq!(tree.collection_names(), vec!["colors", "animals/cats"]);
    /// ```
    pub fn from_root_map(map: &Value) -> Self {
        let mut tree = Self::new();
        for (name, entries) in flatten_structured(map, "", "", "<root map>") {
            if name.is_empty() {
                tracing::warn!("Skipping unnamed list at the root of the wildcard map");
                continue;
            }
            tree.add_collection(&name, WildcardCollection::list(entries));
        }
        tree
    }

    /// Register a collection under a full `/`-separated name.
    pub fn add_collection(&mut self, full_name: &str, collection: WildcardCollection) {
        let parts: Vec<&str> = full_name.split('/').filter(|p| !p.is_empty()).collect();
        let Some((leaf, parents)) = parts.split_last() else {
            return;
        };
        self.root
            .node_mut(parents)
            .collections
            .entry(leaf.to_string())
            .or_default()
            .push(collection);
    }

    /// Register in-memory entries under a full name.
    pub fn add_list(&mut self, full_name: &str, entries: Vec<WildcardItem>) {
        self.add_collection(full_name, WildcardCollection::list(entries));
    }

    fn add_structured_file(&mut self, path: &Path, name: &str, format: SourceFormat) {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Failed to read wildcard file '{}': {}", path.display(), e);
                return;
            }
        };
        let value = match parse_structured(&content, format) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to parse wildcard file '{}': {}", path.display(), e);
                return;
            }
        };
        let parent = name.rsplit_once('/').map(|(p, _)| p).unwrap_or("");
        let source = path.display().to_string();
        for (collection_name, entries) in flatten_structured(&value, name, parent, &source) {
            self.add_collection(&collection_name, WildcardCollection::list(entries));
        }
    }

    /// Every full collection name: this level's collections first, then
    /// children, each in name order.
    pub fn collection_names(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.root.collect_names("", &mut out);
        out
    }

    /// The collections registered under a full name.
    pub fn get_collections(&self, full_name: &str) -> &[WildcardCollection] {
        let parts: Vec<&str> = full_name.split('/').filter(|p| !p.is_empty()).collect();
        let Some((leaf, parents)) = parts.split_last() else {
            return &[];
        };
        self.root
            .node(parents)
            .and_then(|node| node.collections.get(*leaf))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.root.collections.is_empty() && self.root.children.is_empty()
    }
}

/// `a\b/c.txt` -> `a/b/c`.
fn collection_name_for(relative: &Path) -> String {
    let without_ext = relative.with_extension("");
    without_ext
        .to_string_lossy()
        .replace('\\', "/")
        .trim_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_name_for() {
        assert_eq!(collection_name_for(Path::new("colors.txt")), "colors");
        assert_eq!(collection_name_for(Path::new("a/b/cats.yaml")), "a/b/cats");
    }

    #[test]
    fn test_add_and_get_collections() {
        let mut tree = WildcardTree::new();
        tree.add_list("a/b", vec![WildcardItem::plain("x")]);
        tree.add_list("a/b", vec![WildcardItem::plain("y")]);
        assert_eq!(tree.get_collections("a/b").len(), 2);
        assert!(tree.get_collections("a/c").is_empty());
        assert!(tree.get_collections("").is_empty());
        assert_eq!(tree.collection_names(), vec!["a/b"]);
    }

    #[test]
    fn test_root_map_skips_scalars() {
        let tree = WildcardTree::from_root_map(&json!({"a": ["x"], "b": 3}));
        assert_eq!(tree.collection_names(), vec!["a"]);
    }

    #[test]
    fn test_missing_directory_gives_empty_tree() {
        let tree = WildcardTree::from_path(Path::new("/definitely/not/here"));
        assert!(tree.is_empty());
    }
}
