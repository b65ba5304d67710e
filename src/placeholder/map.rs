//! Ordered collection of the distinct placeholders of one template.

use alloc::vec::Vec;

use indexmap::IndexMap as IndexMapRaw;

use super::{Index, Placeholder};

type IndexMap<K, V> = IndexMapRaw<K, V, hashbrown::DefaultHashBuilder>;

/// The distinct placeholders of a template, keyed by index in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderMap {
    entries: IndexMap<Index, Placeholder>,
}

impl PlaceholderMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `placeholder` unless its index is already present.
    ///
    /// Returns `false` when an entry with the same index was kept instead.
    pub fn add(&mut self, placeholder: Placeholder) -> bool {
        if self.entries.contains_key(placeholder.index()) {
            return false;
        }
        self.entries.insert(placeholder.index().clone(), placeholder);
        true
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of distinct placeholders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the template has no placeholders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a placeholder with this index exists.
    #[must_use]
    pub fn contains(&self, index: &Index) -> bool {
        self.entries.contains_key(index)
    }

    /// Looks a placeholder up by index.
    #[must_use]
    pub fn get(&self, index: &Index) -> Option<&Placeholder> {
        self.entries.get(index)
    }

    /// Looks a placeholder up by index, mutably.
    pub fn get_mut(&mut self, index: &Index) -> Option<&mut Placeholder> {
        self.entries.get_mut(index)
    }

    /// Iterates in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &Placeholder> {
        self.entries.values()
    }

    /// Iterates mutably in first-seen order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Placeholder> {
        self.entries.values_mut()
    }

    /// Iterates over the placeholders whose index is in `keys`, in map order.
    pub fn iter_keys<'a>(&'a self, keys: &'a [Index]) -> impl Iterator<Item = &'a Placeholder> {
        self.entries
            .iter()
            .filter(move |(index, _)| keys.contains(index))
            .map(|(_, placeholder)| placeholder)
    }

    /// Indices in first-seen order.
    #[must_use]
    pub fn indices(&self) -> Vec<Index> {
        self.entries.keys().cloned().collect()
    }

    /// Clears every bound value.
    pub fn flush(&mut self) {
        for placeholder in self.entries.values_mut() {
            placeholder.flush();
        }
    }
}

impl<'a> IntoIterator for &'a PlaceholderMap {
    type Item = &'a Placeholder;
    type IntoIter = indexmap::map::Values<'a, Index, Placeholder>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

impl FromIterator<Placeholder> for PlaceholderMap {
    fn from_iter<I: IntoIterator<Item = Placeholder>>(iter: I) -> Self {
        let mut map = Self::new();
        for placeholder in iter {
            map.add(placeholder);
        }
        map
    }
}
