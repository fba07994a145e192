//! Wildcard lookup with glob matching and result caching.

use super::collection::WildcardCollection;
use super::config::WildcardConfig;
use super::item::WildcardItem;
use super::tree::WildcardTree;
use super::values::WildcardValues;
use crate::parser::ParserConfig;
use globset::{GlobBuilder, GlobMatcher};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Where the collections come from.
enum TreeSource {
    Empty,
    Path(PathBuf),
    RootMap(Value),
    Collections(Vec<(String, Vec<WildcardItem>)>),
}

impl TreeSource {
    fn build(&self) -> WildcardTree {
        match self {
            TreeSource::Empty => WildcardTree::new(),
            TreeSource::Path(path) => WildcardTree::from_path(path),
            TreeSource::RootMap(map) => WildcardTree::from_root_map(map),
            TreeSource::Collections(collections) => {
                let mut tree = WildcardTree::new();
                for (name, entries) in collections {
                    tree.add_collection(name, WildcardCollection::list(entries.clone()));
                }
                tree
            }
        }
    }
}

/// Resolves wildcard patterns to values.
///
/// The tree is built on first use and text files are read on first match.
/// Caches use `RefCell`, so a manager is confined to one thread; share it
/// with `Rc`.
pub struct WildcardManager {
    source: TreeSource,
    config: WildcardConfig,
    wildcard_wrap: String,
    tree: RefCell<Option<Rc<WildcardTree>>>,
    cache: RefCell<HashMap<String, WildcardValues>>,
    shuffle_rng: RefCell<StdRng>,
}

impl fmt::Debug for WildcardManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WildcardManager")
            .field("path", &self.path())
            .field("wildcard_wrap", &self.wildcard_wrap)
            .field("config", &self.config)
            .field("cached_patterns", &self.cache.borrow().len())
            .finish()
    }
}

impl Default for WildcardManager {
    fn default() -> Self {
        Self::with_source(TreeSource::Empty, WildcardConfig::default())
    }
}

impl WildcardManager {
    fn with_source(source: TreeSource, config: WildcardConfig) -> Self {
        let shuffle_rng = shuffle_rng_for(&config);
        Self {
            source,
            config,
            wildcard_wrap: ParserConfig::default().wildcard_wrap,
            tree: RefCell::new(None),
            cache: RefCell::new(HashMap::new()),
            shuffle_rng: RefCell::new(shuffle_rng),
        }
    }

    /// A manager with no collections.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A manager reading wildcard files below `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let config = WildcardConfig {
            path: Some(path.clone()),
            ..WildcardConfig::default()
        };
        Self::with_source(TreeSource::Path(path), config)
    }

    /// A manager over a nested map whose leaf lists are collections.
    pub fn from_root_map(map: Value) -> Self {
        Self::with_source(TreeSource::RootMap(map), WildcardConfig::default())
    }

    /// A manager over in-memory collections.
    ///
    /// ```
    /// use wildprompt::wildcards::WildcardManager;
    ///
    /// let manager = WildcardManager::from_collections([("colors", vec!["red", "blue"])]);
    /// assert_eq!(manager.get_values("colors").string_values(), vec!["red", "blue"]);
    /// ```
    pub fn from_collections<I, K, V, T>(collections: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoIterator<Item = T>,
        T: Into<WildcardItem>,
    {
        let collections = collections
            .into_iter()
            .map(|(name, entries)| (name.into(), entries.into_iter().map(Into::into).collect()))
            .collect();
        Self::with_source(TreeSource::Collections(collections), WildcardConfig::default())
    }

    /// Replace the settings. A configured `path` replaces the current source.
    pub fn with_config(mut self, config: WildcardConfig) -> Self {
        if let Some(path) = &config.path {
            self.source = TreeSource::Path(path.clone());
        }
        *self.shuffle_rng.get_mut() = shuffle_rng_for(&config);
        self.config = config;
        self.clear_cache();
        self
    }

    pub fn with_wildcard_wrap(mut self, wrap: impl Into<String>) -> Self {
        self.wildcard_wrap = wrap.into();
        self.clear_cache();
        self
    }

    pub fn wildcard_wrap(&self) -> &str {
        &self.wildcard_wrap
    }

    pub fn config(&self) -> &WildcardConfig {
        &self.config
    }

    /// Root directory, for file-backed managers.
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            TreeSource::Path(path) => Some(path),
            _ => None,
        }
    }

    /// Whether `text` is a wrapped wildcard token such as `__colors__`.
    pub fn is_wildcard(&self, text: &str) -> bool {
        let wrap = self.wildcard_wrap.as_str();
        !wrap.is_empty()
            && text.len() >= wrap.len() * 2
            && text.starts_with(wrap)
            && text.ends_with(wrap)
    }

    /// Wrap a collection name into a wildcard token.
    pub fn to_wildcard(&self, name: &str) -> String {
        format!("{}{}{}", self.wildcard_wrap, name, self.wildcard_wrap)
    }

    /// Drop the loaded tree, file contents and the pattern cache.
    pub fn clear_cache(&self) {
        self.tree.borrow_mut().take();
        self.cache.borrow_mut().clear();
    }

    /// Every full collection name, sorted.
    pub fn collection_names(&self) -> Vec<String> {
        let mut names = self.tree().collection_names();
        names.sort();
        names
    }

    /// Full names of the collections matching a glob pattern.
    ///
    /// `*` stays within one path segment, `**` crosses segments. Invalid
    /// patterns are logged and match nothing.
    pub fn match_collections(&self, pattern: &str) -> Vec<String> {
        match self.sanitize(pattern) {
            Some(pattern) => self.match_sanitized(&pattern),
            None => Vec::new(),
        }
    }

    /// Resolve a pattern to the entries of every matching collection.
    ///
    /// A pattern without glob characters that matches nothing is retried as
    /// `**/pattern`. Missing wildcards and invalid patterns give empty values.
    pub fn get_values(&self, pattern: &str) -> WildcardValues {
        let Some(pattern) = self.sanitize(pattern) else {
            return WildcardValues::empty();
        };

        if let Some(values) = self.cache.borrow().get(&pattern) {
            return values.clone();
        }

        let mut names = self.match_sanitized(&pattern);
        if names.is_empty() && !has_glob_chars(&pattern) {
            let qualified = format!("**/{}", pattern);
            names = self.match_sanitized(&qualified);
            if !names.is_empty() {
                tracing::warn!(
                    "Wildcard '{}' is not fully qualified; matched {:?} with '{}'",
                    pattern,
                    names,
                    qualified
                );
            }
        }

        let tree = self.tree();
        let mut items: Vec<WildcardItem> = names
            .iter()
            .flat_map(|name| tree.get_collections(name))
            .flat_map(WildcardCollection::entries)
            .collect();

        if self.config.dedup {
            let mut seen = HashSet::new();
            items.retain(|item| seen.insert(item.content().to_string()));
        }
        if self.config.shuffle {
            items.shuffle(&mut *self.shuffle_rng.borrow_mut());
        } else if self.config.sort {
            items.sort_by(|a, b| a.content().cmp(b.content()));
        }

        let values = WildcardValues::new(items);
        let mut cache = self.cache.borrow_mut();
        if cache.len() >= self.config.cache_limit {
            tracing::trace!("Wildcard cache reached {} entries; clearing", cache.len());
            cache.clear();
        }
        cache.insert(pattern, values.clone());
        values
    }

    fn tree(&self) -> Rc<WildcardTree> {
        if let Some(tree) = self.tree.borrow().as_ref() {
            return Rc::clone(tree);
        }
        let tree = Rc::new(self.source.build());
        *self.tree.borrow_mut() = Some(Rc::clone(&tree));
        tree
    }

    fn match_sanitized(&self, pattern: &str) -> Vec<String> {
        let matcher = match compile_glob(pattern) {
            Ok(matcher) => matcher,
            Err(e) => {
                tracing::warn!("Invalid wildcard pattern '{}': {}", pattern, e);
                return Vec::new();
            }
        };
        self.collection_names()
            .into_iter()
            .filter(|name| matcher.is_match(name))
            .collect()
    }

    /// Normalize a pattern: strip the wildcard wrap, use `/` separators,
    /// trim surrounding slashes and reject parent-directory segments.
    fn sanitize(&self, pattern: &str) -> Option<String> {
        let trimmed = pattern.trim();
        let unwrapped = if self.is_wildcard(trimmed) {
            let wrap = self.wildcard_wrap.len();
            &trimmed[wrap..trimmed.len() - wrap]
        } else {
            trimmed
        };

        let normalized = unwrapped.replace('\\', "/");
        let normalized = normalized.trim_matches('/');
        if normalized.is_empty() {
            tracing::warn!("Empty wildcard pattern '{}'", pattern);
            return None;
        }
        if normalized.split('/').any(|segment| segment == "..") {
            tracing::warn!(
                "Rejecting wildcard pattern '{}': parent directory references are not allowed",
                pattern
            );
            return None;
        }
        Some(normalized.to_string())
    }
}

fn compile_glob(pattern: &str) -> Result<GlobMatcher, globset::Error> {
    Ok(GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()?
        .compile_matcher())
}

fn has_glob_chars(pattern: &str) -> bool {
    pattern.contains(['*', '?', '[', '{'])
}

fn shuffle_rng_for(config: &WildcardConfig) -> StdRng {
    match config.shuffle_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
