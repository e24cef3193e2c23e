//! Median-split partition tree over a start-sorted interval list.
//!
//! # Layout
//!
//! Each node picks the middle entry of its slice as pivot and uses the
//! pivot's start as `median`. Intervals are then split three ways:
//!
//! ```text
//! left   : end   <  median
//! center : start <= median <= end   (the pivot always lands here)
//! right  : start >  median
//! ```
//!
//! `left` only holds entries that sit before the pivot in the sorted slice and
//! `right` only entries after it, so each child receives at most half of its
//! parent's slice and the depth never exceeds `floor(log2 n) + 1`.
//!
//! Nodes store positions into the owning index's interval list rather than
//! the intervals themselves. A tree is therefore only meaningful for the exact
//! list it was built from, which is why it is reachable only through
//! [`IntervalIndex`](crate::index::IntervalIndex) and is thrown away on every
//! mutation.

use crate::interval::{overlaps, Interval, Timespan, Timestamp};

/// A single node of the partition tree.
#[derive(Debug)]
pub struct PartitionNode {
    median: Timestamp,
    /// Center positions ascending by start.
    by_start: Vec<usize>,
    /// Center positions descending by end.
    by_end: Vec<usize>,
    left: Option<Box<PartitionNode>>,
    right: Option<Box<PartitionNode>>,
}

impl PartitionNode {
    /// Returns the start of the pivot interval this node splits on.
    pub fn median(&self) -> Timestamp {
        self.median
    }

    /// Returns the number of intervals straddling the median.
    pub fn center_len(&self) -> usize {
        self.by_start.len()
    }

    fn build<T: Interval>(items: &[T], positions: Vec<usize>) -> Option<Box<Self>> {
        if positions.is_empty() {
            return None;
        }

        let pivot = positions[positions.len() / 2];
        let median = items[pivot].start();

        let mut left = Vec::new();
        let mut right = Vec::new();
        let mut center = Vec::new();

        for pos in positions {
            let item = &items[pos];
            if pos == pivot {
                center.push(pos);
            } else if item.end() < median {
                left.push(pos);
            } else if item.start() > median {
                right.push(pos);
            } else {
                center.push(pos);
            }
        }

        let mut by_end = center.clone();
        by_end.sort_by(|&a, &b| items[b].end().cmp(&items[a].end()));

        Some(Box::new(Self {
            median,
            by_start: center,
            by_end,
            left: Self::build(items, left),
            right: Self::build(items, right),
        }))
    }

    fn collect<'a, T: Interval>(
        &'a self,
        items: &[T],
        span: Timespan,
        out: &mut Vec<(usize, &'a PartitionNode)>,
    ) {
        if span.start < self.median {
            if let Some(left) = &self.left {
                left.collect(items, span, out);
            }
        }

        let matches = |pos: usize| {
            let item = &items[pos];
            overlaps(item.start(), item.end(), span.start, span.end)
        };

        if span.end <= self.median {
            // Every center entry ends at or after the median, so only the
            // start bound can fail.
            for &pos in &self.by_start {
                if items[pos].start() >= span.end {
                    break;
                }
                if matches(pos) {
                    out.push((pos, self));
                }
            }
        } else if span.start >= self.median {
            // Every center entry starts at or before the median, so only the
            // end bound can fail.
            for &pos in &self.by_end {
                if items[pos].end() <= span.start {
                    break;
                }
                if matches(pos) {
                    out.push((pos, self));
                }
            }
        } else {
            for &pos in &self.by_start {
                if matches(pos) {
                    out.push((pos, self));
                }
            }
        }

        if span.end > self.median {
            if let Some(right) = &self.right {
                right.collect(items, span, out);
            }
        }
    }

    fn touched(&self, span: Timespan) -> usize {
        let mut count = 1;
        if span.start < self.median {
            count += self.left.as_ref().map_or(0, |node| node.touched(span));
        }
        if span.end > self.median {
            count += self.right.as_ref().map_or(0, |node| node.touched(span));
        }
        count
    }

    fn accumulate(&self, depth: usize, stats: &mut TreeStats) {
        stats.node_count += 1;
        stats.depth = stats.depth.max(depth);
        stats.max_center = stats.max_center.max(self.by_start.len());
        stats.interval_count += self.by_start.len();

        for child in [&self.left, &self.right].into_iter().flatten() {
            child.accumulate(depth + 1, stats);
        }
    }
}

/// Shape statistics for a partition tree.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TreeStats {
    /// Number of nodes.
    pub node_count: usize,
    /// Length of the longest root-to-leaf path, in nodes.
    pub depth: usize,
    /// Largest center set held by any single node.
    pub max_center: usize,
    /// Number of intervals held across all nodes.
    pub interval_count: usize,
}

/// Derived overlap-query structure over an index's interval list.
#[derive(Debug)]
pub struct PartitionTree {
    root: Option<Box<PartitionNode>>,
    generation: u64,
}

impl PartitionTree {
    /// Builds a tree over `items`, which must be sorted ascending by start.
    pub(crate) fn build<T: Interval>(items: &[T], generation: u64) -> Self {
        let positions = (0..items.len()).collect();
        Self {
            root: PartitionNode::build(items, positions),
            generation,
        }
    }

    /// Returns the build number of this tree.
    ///
    /// Each rebuild produces a higher generation; two calls that observe the
    /// same generation observed the same tree.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns true if the tree holds no intervals.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the root node, if any.
    pub fn root(&self) -> Option<&PartitionNode> {
        self.root.as_deref()
    }

    /// Returns the number of nodes a query for `span` would visit.
    pub fn nodes_touched(&self, span: Timespan) -> usize {
        self.root.as_ref().map_or(0, |root| root.touched(span))
    }

    /// Computes shape statistics by walking the whole tree.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        if let Some(root) = &self.root {
            root.accumulate(1, &mut stats);
        }
        stats
    }

    /// Returns the positions of every interval overlapping `span`, ascending,
    /// paired with the node that held it.
    pub(crate) fn matches<'a, T: Interval>(
        &'a self,
        items: &[T],
        span: Timespan,
    ) -> Vec<(usize, &'a PartitionNode)> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            root.collect(items, span, &mut out);
        }
        out.sort_unstable_by_key(|(pos, _)| *pos);
        out
    }
}
