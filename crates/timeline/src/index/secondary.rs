//! Secondary groupings of stored intervals by a named field.

use crate::interval::{Interval, IndexValue};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Buckets of interval ids, one map per registered grouping key.
///
/// Buckets hold ids rather than intervals; the owning index resolves them
/// back to its stored records. An emptied bucket is dropped so that lookups
/// for a value with no remaining members report nothing.
#[derive(Debug)]
pub(crate) struct SecondaryIndexes<Id> {
    groups: HashMap<String, HashMap<IndexValue, Vec<Id>>>,
}

impl<Id: Eq + Hash + Clone> SecondaryIndexes<Id> {
    pub(crate) fn new() -> Self {
        Self {
            groups: HashMap::new(),
        }
    }

    pub(crate) fn is_registered(&self, key: &str) -> bool {
        self.groups.contains_key(key)
    }

    /// Registers `key` and groups `items` under it in their current order.
    ///
    /// Returns false if the key was already registered.
    pub(crate) fn register<T>(&mut self, key: &str, items: &[T]) -> bool
    where
        T: Interval<Id = Id>,
    {
        if self.is_registered(key) {
            return false;
        }

        let mut buckets: HashMap<IndexValue, Vec<Id>> = HashMap::new();
        for item in items {
            if let Some(value) = item.field(key) {
                buckets.entry(value).or_default().push(item.id().clone());
            }
        }
        self.groups.insert(key.to_string(), buckets);
        true
    }

    /// Appends `item` to its bucket under every registered key.
    pub(crate) fn insert<T>(&mut self, item: &T)
    where
        T: Interval<Id = Id>,
    {
        for (key, buckets) in self.groups.iter_mut() {
            if let Some(value) = item.field(key) {
                buckets.entry(value).or_default().push(item.id().clone());
            }
        }
    }

    /// Removes `item` from its bucket under every registered key.
    pub(crate) fn remove<T>(&mut self, item: &T)
    where
        T: Interval<Id = Id>,
    {
        self.remove_all(std::slice::from_ref(item));
    }

    /// Removes every interval in `removed` from its buckets.
    ///
    /// Each affected bucket is filtered once, so a bulk prune costs one pass
    /// over the touched buckets rather than one pass per removed interval.
    pub(crate) fn remove_all<T>(&mut self, removed: &[T])
    where
        T: Interval<Id = Id>,
    {
        if removed.is_empty() {
            return;
        }

        for (key, buckets) in self.groups.iter_mut() {
            let mut doomed: HashMap<IndexValue, HashSet<&Id>> = HashMap::new();
            for item in removed {
                if let Some(value) = item.field(key) {
                    doomed.entry(value).or_default().insert(item.id());
                }
            }

            for (value, ids) in doomed {
                if let Some(bucket) = buckets.get_mut(&value) {
                    bucket.retain(|id| !ids.contains(id));
                    if bucket.is_empty() {
                        buckets.remove(&value);
                    }
                }
            }
        }
    }

    pub(crate) fn bucket(&self, key: &str, value: &IndexValue) -> Option<&[Id]> {
        self.groups
            .get(key)
            .and_then(|buckets| buckets.get(value))
            .map(Vec::as_slice)
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub(crate) fn len(&self) -> usize {
        self.groups.len()
    }
}
