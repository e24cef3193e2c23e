//! Interval index and its derived partition tree.
//!
//! # Architecture
//!
//! [`IntervalIndex`] owns the canonical, start-ordered interval list, an id
//! lookup and any secondary groupings. [`PartitionTree`] is derived from that
//! list on demand:
//!
//! ```text
//! add / remove / prune → tree marked stale → next query rebuilds → walk tree
//! ```
//!
//! The tree is never patched in place; a stale tree is discarded and rebuilt
//! wholesale.

pub mod config;
mod secondary;
pub mod store;
pub mod tree;

pub use config::{IndexConfig, TieBreak, DEFAULT_INITIAL_CAPACITY};
pub use store::{IndexStats, IntervalIndex};
pub use tree::{PartitionNode, PartitionTree, TreeStats};
