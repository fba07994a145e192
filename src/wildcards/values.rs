//! Resolved wildcard value sets.

use super::item::WildcardItem;
use std::rc::Rc;

/// The entries a wildcard pattern resolved to.
///
/// Immutable and cheap to clone; the manager hands out copies from its
/// pattern cache.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WildcardValues {
    items: Rc<[WildcardItem]>,
}

impl WildcardValues {
    pub fn new(items: Vec<WildcardItem>) -> Self {
        Self {
            items: items.into(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Build plain (unit weight) values from strings.
    pub fn from_strings<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(values.into_iter().map(|s| WildcardItem::plain(s)).collect())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[WildcardItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WildcardItem> {
        self.items.iter()
    }

    pub fn get(&self, index: usize) -> Option<&WildcardItem> {
        self.items.get(index)
    }

    /// The text of every entry, in order.
    pub fn string_values(&self) -> Vec<&str> {
        self.items.iter().map(WildcardItem::content).collect()
    }

    pub fn weights(&self) -> Vec<f64> {
        self.items.iter().map(WildcardItem::weight).collect()
    }

    /// Running sums of the weights, suitable for binary-search sampling.
    pub fn cumulative_weights(&self) -> Vec<f64> {
        self.items
            .iter()
            .scan(0.0, |acc, item| {
                *acc += item.weight();
                Some(*acc)
            })
            .collect()
    }

    /// True if not every entry has the same weight.
    pub fn has_varied_weights(&self) -> bool {
        let mut weights = self.items.iter().map(WildcardItem::weight);
        match weights.next() {
            Some(first) => weights.any(|w| w != first),
            None => false,
        }
    }
}

impl<'a> IntoIterator for &'a WildcardValues {
    type Item = &'a WildcardItem;
    type IntoIter = std::slice::Iter<'a, WildcardItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl From<Vec<WildcardItem>> for WildcardValues {
    fn from(items: Vec<WildcardItem>) -> Self {
        Self::new(items)
    }
}
