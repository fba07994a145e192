//! Wildcard resolution.
//!
//! A wildcard such as `__animals/*__` names one or more collections of
//! values. Collections come from a directory of `.txt`, `.json` and `.yaml`
//! files, from a nested map, or from in-memory lists; [`WildcardManager`]
//! matches patterns against their `/`-separated names and returns the
//! combined [`WildcardValues`].
//!
//! Missing wildcards and bad patterns are never errors: they are logged and
//! resolve to empty values.

mod collection;
mod config;
mod item;
mod loader;
mod manager;
mod tree;
mod values;


pub use collection::WildcardCollection;
pub use config::WildcardConfig;
pub use item::WildcardItem;
pub use manager::WildcardManager;
pub use tree::{WildcardTree, WildcardTreeNode};
pub use values::WildcardValues;
