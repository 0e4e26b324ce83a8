//! Result store implementation

use crate::types::{Item, ItemId};
use std::borrow::Cow;
use std::collections::HashSet;

/// Merge `incoming` onto the end of `existing`, skipping ids already present.
///
/// Existing items keep their order. Incoming items keep their relative order,
/// and an id repeated inside `incoming` is only taken the first time. When
/// nothing new arrives the input slice is handed back borrowed.
pub fn merge<'a>(existing: &'a [Item], incoming: &[Item]) -> Cow<'a, [Item]> {
    let mut seen: HashSet<ItemId> = existing.iter().map(|item| item.id).collect();
    let fresh: Vec<&Item> = incoming
        .iter()
        .filter(|item| seen.insert(item.id))
        .collect();

    if fresh.is_empty() {
        return Cow::Borrowed(existing);
    }

    let mut merged = Vec::with_capacity(existing.len() + fresh.len());
    merged.extend_from_slice(existing);
    merged.extend(fresh.into_iter().cloned());
    Cow::Owned(merged)
}

/// Ordered collection of items with a unique id set.
///
/// `ids.len() == items.len()` holds after every operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultStore {
    items: Vec<Item>,
    ids: HashSet<ItemId>,
}

impl ResultStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from items, dropping later duplicates
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let mut store = Self::new();
        store.merge_in_place(items);
        store
    }

    /// Append every item whose id is not yet stored; returns how many were added
    pub fn merge_in_place(&mut self, incoming: impl IntoIterator<Item = Item>) -> usize {
        let before = self.items.len();
        for item in incoming {
            if self.ids.insert(item.id) {
                self.items.push(item);
            }
        }
        self.items.len() - before
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.items.clear();
        self.ids.clear();
    }

    /// Number of stored items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether an item with this id is stored
    pub fn contains(&self, id: ItemId) -> bool {
        self.ids.contains(&id)
    }

    /// Look up a stored item by id
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        if !self.contains(id) {
            return None;
        }
        self.items.iter().find(|item| item.id == id)
    }

    /// Stored ids in insertion order
    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id).collect()
    }

    /// Stored items in insertion order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Iterate stored items in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a ResultStore {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
