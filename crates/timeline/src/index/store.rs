//! Interval index: the start-ordered interval list plus its derived tree.

use crate::error::{IndexError, Result};
use crate::index::config::{IndexConfig, TieBreak};
use crate::index::secondary::SecondaryIndexes;
use crate::index::tree::{PartitionNode, PartitionTree, TreeStats};
use crate::interval::{IndexValue, Interval, Timespan, Timestamp};
use std::collections::HashMap;
use std::ops::Range;
use tracing::{debug, trace};

/// Statistics for an interval index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStats {
    /// Number of stored intervals.
    pub interval_count: usize,
    /// Number of registered secondary groupings.
    pub indexed_keys: usize,
    /// True if the partition tree is current.
    pub synced: bool,
    /// Number of tree builds performed so far.
    pub generation: u64,
    /// Shape of the current tree, if it is current.
    pub tree: Option<TreeStats>,
}

/// In-memory index of time-ranged records answering overlap queries.
///
/// Intervals are kept ascending by start. Among intervals with equal start,
/// [`TieBreak::NewestFirst`] (the default) places the most recently added
/// one first. Each mutation marks the partition tree stale; the next query
/// rebuilds it from the whole list.
///
/// # Example
///
/// ```rust,ignore
/// use alopex_timeline::{Busytime, IntervalIndex, Timespan};
///
/// let mut index = IntervalIndex::new();
/// index.add(Busytime::new("bt-1", "event-1", "work", 1050, 1400))?;
/// index.add(Busytime::new("bt-2", "event-2", "work", 1250, 1280))?;
///
/// let busy = index.query(Timespan::new(1200, 1300));
/// assert_eq!(busy.len(), 2);
/// ```
#[derive(Debug)]
pub struct IntervalIndex<T: Interval> {
    config: IndexConfig,
    /// Canonical order: ascending start, ties per `config.tie_break`.
    items: Vec<T>,
    /// Id -> start of the stored interval with that id.
    by_id: HashMap<T::Id, Timestamp>,
    secondary: SecondaryIndexes<T::Id>,
    /// Current partition tree; `None` while stale.
    tree: Option<PartitionTree>,
    generation: u64,
}

impl<T: Interval> Default for IntervalIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Interval> IntervalIndex<T> {
    /// Creates an empty index with the default configuration.
    pub fn new() -> Self {
        Self::with_config(IndexConfig::default())
    }

    /// Creates an empty index with the given configuration.
    pub fn with_config(config: IndexConfig) -> Self {
        Self {
            items: Vec::with_capacity(config.initial_capacity),
            by_id: HashMap::with_capacity(config.initial_capacity),
            secondary: SecondaryIndexes::new(),
            tree: None,
            generation: 0,
            config,
        }
    }

    /// Creates an index from an initial, possibly unsorted, collection.
    ///
    /// The result is ordered exactly as if every interval had been passed to
    /// [`add`](Self::add) in iteration order: the first interval seen for an
    /// id wins and equal starts follow the configured tie-break.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvertedInterval` if any interval ends before it
    /// starts.
    pub fn from_intervals<I>(config: IndexConfig, intervals: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let mut index = Self::with_config(config);
        let mut staged: Vec<(usize, T)> = Vec::new();

        for item in intervals {
            check_interval(&item)?;
            if index.by_id.contains_key(item.id()) {
                trace!("Ignoring duplicate interval id {:?}", item.id());
                continue;
            }
            index.by_id.insert(item.id().clone(), item.start());
            staged.push((staged.len(), item));
        }

        match index.config.tie_break {
            TieBreak::NewestFirst => staged.sort_by(|(seq_a, a), (seq_b, b)| {
                a.start().cmp(&b.start()).then(seq_b.cmp(seq_a))
            }),
            TieBreak::OldestFirst => staged.sort_by_key(|(_, item)| item.start()),
        }

        index.items.extend(staged.into_iter().map(|(_, item)| item));
        debug!("Loaded {} intervals into index", index.items.len());
        Ok(index)
    }

    /// Returns the configuration.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Returns the number of stored intervals.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if no intervals are stored.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the stored intervals in canonical order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Returns an iterator over the stored intervals in canonical order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Returns true if an interval with this id is stored.
    pub fn contains_id(&self, id: &T::Id) -> bool {
        self.by_id.contains_key(id)
    }

    /// Returns the stored interval with this id.
    pub fn get(&self, id: &T::Id) -> Option<&T> {
        let start = *self.by_id.get(id)?;
        self.position_of(start, id).map(|pos| &self.items[pos])
    }

    /// Returns true if the partition tree reflects every mutation so far.
    pub fn is_synced(&self) -> bool {
        self.tree.is_some()
    }

    /// Inserts an interval in start order.
    ///
    /// Returns `Ok(false)` without touching the index if an interval with the
    /// same id is already stored; the stored one is kept.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvertedInterval` if the interval ends before it
    /// starts.
    pub fn add(&mut self, item: T) -> Result<bool> {
        check_interval(&item)?;
        if self.by_id.contains_key(item.id()) {
            trace!("Ignoring duplicate interval id {:?}", item.id());
            return Ok(false);
        }

        let pos = self.insert_position(item.start());
        self.by_id.insert(item.id().clone(), item.start());
        self.secondary.insert(&item);
        self.items.insert(pos, item);
        self.invalidate();
        Ok(true)
    }

    /// Removes the stored interval with the same start and id as `item`.
    ///
    /// Returns false, leaving the index untouched, if no such interval exists.
    pub fn remove(&mut self, item: &T) -> bool {
        match self.position_of(item.start(), item.id()) {
            Some(pos) => {
                self.remove_at(pos);
                true
            }
            None => false,
        }
    }

    /// Removes and returns the stored interval with this id.
    pub fn remove_by_id(&mut self, id: &T::Id) -> Option<T> {
        let start = *self.by_id.get(id)?;
        let pos = self.position_of(start, id)?;
        Some(self.remove_at(pos))
    }

    /// Removes every interval starting after `cutoff`.
    ///
    /// Returns the number of intervals removed.
    pub fn remove_future_intervals(&mut self, cutoff: Timestamp) -> usize {
        let first = self.items.partition_point(|item| item.start() <= cutoff);
        let removed = self.items.split_off(first);
        self.forget(&removed);

        if !removed.is_empty() {
            debug!(
                "Removed {} intervals starting after {}",
                removed.len(),
                cutoff
            );
            self.invalidate();
        }
        removed.len()
    }

    /// Removes every interval ending at or before `cutoff`.
    ///
    /// The list is ordered by start, not end, so this scans every interval.
    /// Returns the number of intervals removed.
    pub fn remove_past_intervals(&mut self, cutoff: Timestamp) -> usize {
        let (kept, removed): (Vec<T>, Vec<T>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| item.end() > cutoff);
        self.items = kept;
        self.forget(&removed);

        if !removed.is_empty() {
            debug!(
                "Removed {} intervals ending at or before {}",
                removed.len(),
                cutoff
            );
            self.invalidate();
        }
        removed.len()
    }

    /// Returns the partition tree, rebuilding it first if it is stale.
    pub fn build(&mut self) -> &PartitionTree {
        refresh(&mut self.tree, &self.items, &mut self.generation)
    }

    /// Returns every interval overlapping `span`, in canonical order.
    ///
    /// Overlap is half-open: an interval ending exactly at `span.start`, or
    /// starting exactly at `span.end`, does not match.
    pub fn query(&mut self, span: Timespan) -> Vec<&T> {
        self.build();
        self.query_built(span).unwrap_or_default()
    }

    /// Same as [`query`](Self::query) but never rebuilds the tree.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::StaleTree` if the index changed since the last
    /// [`build`](Self::build).
    pub fn query_built(&self, span: Timespan) -> Result<Vec<&T>> {
        let tree = self.tree.as_ref().ok_or(IndexError::StaleTree)?;

        Ok(tree
            .matches(&self.items, span)
            .into_iter()
            .map(|(pos, _)| &self.items[pos])
            .collect())
    }

    /// Calls `visit` once for every interval overlapping `span`, in canonical
    /// order, together with the tree node that holds it.
    pub fn traverse<F>(&mut self, span: Timespan, mut visit: F)
    where
        F: FnMut(&T, &PartitionNode),
    {
        let tree = refresh(&mut self.tree, &self.items, &mut self.generation);
        for (pos, node) in tree.matches(&self.items, span) {
            visit(&self.items[pos], node);
        }
    }

    /// Registers a secondary grouping on `key` and fills it from the stored
    /// intervals. Does nothing if `key` is already registered.
    pub fn create_index(&mut self, key: &str) {
        if self.secondary.register(key, &self.items) {
            debug!("Created secondary index on {}", key);
        }
    }

    /// Returns the intervals grouped under `value` for `key`.
    ///
    /// Returns `None` if `key` was never registered or no stored interval has
    /// that value. Intervals appear in the order they joined the group.
    pub fn index(&self, key: &str, value: &IndexValue) -> Option<Vec<&T>> {
        let ids = self.secondary.bucket(key, value)?;
        Some(ids.iter().filter_map(|id| self.get(id)).collect())
    }

    /// Returns the registered grouping keys.
    pub fn indexed_keys(&self) -> impl Iterator<Item = &str> {
        self.secondary.keys()
    }

    /// Returns statistics for this index.
    pub fn stats(&self) -> IndexStats {
        let tree = self.tree.as_ref().map(PartitionTree::stats);

        IndexStats {
            interval_count: self.items.len(),
            indexed_keys: self.secondary.len(),
            synced: tree.is_some(),
            generation: self.generation,
            tree,
        }
    }

    fn invalidate(&mut self) {
        self.tree = None;
    }

    fn insert_position(&self, start: Timestamp) -> usize {
        match self.config.tie_break {
            TieBreak::NewestFirst => self.items.partition_point(|item| item.start() < start),
            TieBreak::OldestFirst => self.items.partition_point(|item| item.start() <= start),
        }
    }

    /// Positions of the contiguous run of intervals starting at `start`.
    fn equal_start_run(&self, start: Timestamp) -> Range<usize> {
        let first = self.items.partition_point(|item| item.start() < start);
        let len = self.items[first..].partition_point(|item| item.start() <= start);
        first..first + len
    }

    fn position_of(&self, start: Timestamp, id: &T::Id) -> Option<usize> {
        self.equal_start_run(start).find(|&pos| self.items[pos].id() == id)
    }

    fn remove_at(&mut self, pos: usize) -> T {
        let item = self.items.remove(pos);
        self.by_id.remove(item.id());
        self.secondary.remove(&item);
        self.invalidate();
        item
    }

    /// Drops lookup and grouping entries for intervals already taken out of
    /// the list.
    fn forget(&mut self, removed: &[T]) {
        for item in removed {
            self.by_id.remove(item.id());
        }
        self.secondary.remove_all(removed);
    }
}

impl<'a, T: Interval> IntoIterator for &'a IntervalIndex<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Returns the current tree, building generation `generation + 1` if stale.
fn refresh<'a, T: Interval>(
    tree: &'a mut Option<PartitionTree>,
    items: &[T],
    generation: &mut u64,
) -> &'a PartitionTree {
    tree.get_or_insert_with(|| {
        *generation += 1;
        debug!(
            "Rebuilt partition tree generation {} over {} intervals",
            generation,
            items.len()
        );
        PartitionTree::build(items, *generation)
    })
}

fn check_interval<T: Interval>(item: &T) -> Result<()> {
    if item.end() < item.start() {
        return Err(IndexError::InvertedInterval {
            start: item.start(),
            end: item.end(),
        });
    }
    Ok(())
}
