//! Named wildcard collections.

use super::item::WildcardItem;
use super::loader::parse_text_entries;
use std::cell::RefCell;
use std::path::PathBuf;

/// A source of wildcard entries.
#[derive(Debug)]
pub enum WildcardCollection {
    /// A `.txt` file, read on first access and cached.
    TextFile {
        path: PathBuf,
        cache: RefCell<Option<Vec<WildcardItem>>>,
    },
    /// Entries parsed from a structured file or given in memory.
    List { entries: Vec<WildcardItem> },
}

impl WildcardCollection {
    pub fn text_file(path: impl Into<PathBuf>) -> Self {
        WildcardCollection::TextFile {
            path: path.into(),
            cache: RefCell::new(None),
        }
    }

    pub fn list(entries: Vec<WildcardItem>) -> Self {
        WildcardCollection::List { entries }
    }

    /// All entries, loading the backing file if needed.
    ///
    /// An unreadable file is logged and yields no entries.
    pub fn entries(&self) -> Vec<WildcardItem> {
        match self {
            WildcardCollection::List { entries } => entries.clone(),
            WildcardCollection::TextFile { path, cache } => {
                if let Some(entries) = cache.borrow().as_ref() {
                    return entries.clone();
                }
                let entries = match std::fs::read_to_string(path) {
                    Ok(content) => parse_text_entries(&content),
                    Err(e) => {
                        tracing::warn!(
                            "Failed to read wildcard file '{}': {}",
                            path.display(),
                            e
                        );
                        Vec::new()
                    }
                };
                *cache.borrow_mut() = Some(entries.clone());
                entries
            }
        }
    }
}
