//! Configuration for [`IntervalIndex`](crate::index::IntervalIndex).

/// Default number of interval slots reserved up front.
pub const DEFAULT_INITIAL_CAPACITY: usize = 64;

/// Ordering among intervals that share the same start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// The most recently added interval is placed before older ones
    /// (default, matches the calendar's existing busytime ordering).
    #[default]
    NewestFirst,
    /// Intervals keep their insertion order.
    OldestFirst,
}

/// Configuration for an interval index.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// How equal-start intervals are ordered.
    ///
    /// Default: [`TieBreak::NewestFirst`].
    pub tie_break: TieBreak,

    /// Capacity reserved for the interval list on creation. Default: 64.
    pub initial_capacity: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            tie_break: TieBreak::default(),
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}

impl IndexConfig {
    /// Creates a new configuration with a custom tie-break policy.
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Creates a new configuration with a custom initial capacity.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}
