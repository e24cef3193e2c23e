//! Timeline - Alopex temporal interval index
//!
//! This crate provides an in-memory index of time-ranged records (calendar
//! busytimes, events) that answers "what overlaps this window?" without
//! scanning every record.
//!
//! # Components
//!
//! - [`IntervalIndex`]: Start-ordered interval store with id lookup,
//!   secondary groupings and bulk pruning
//! - [`PartitionTree`]: Median-split tree rebuilt lazily after mutations
//! - [`RetentionWindow`]: Trims an index to a window around now
//!
//! # Example
//!
//! ```rust,ignore
//! use alopex_timeline::{Busytime, IntervalIndex, Timespan};
//!
//! let mut index = IntervalIndex::new();
//! index.add(Busytime::new("bt-1", "event-1", "work", 100, 800))?;
//! index.add(Busytime::new("bt-2", "event-2", "work", 1050, 1400))?;
//!
//! // The tree is rebuilt on the first query after a mutation
//! for busytime in index.query(Timespan::new(1200, 1300)) {
//!     println!("busy: {}", busytime.id);
//! }
//! ```
//!
//! The index is single-threaded: callers that share it across threads must
//! serialize access themselves.

#![deny(missing_docs)]

pub mod error;
pub mod index;
pub mod interval;
pub mod lifecycle;

pub use error::{IndexError, Result};
pub use index::{
    IndexConfig, IndexStats, IntervalIndex, PartitionNode, PartitionTree, TieBreak, TreeStats,
};
pub use interval::{overlaps, Busytime, IndexValue, Interval, Timespan, Timestamp};
pub use lifecycle::{DefaultWindowPolicy, PruneReport, RetentionWindow, WindowPolicy};
