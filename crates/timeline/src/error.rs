//! Error and Result types for timeline index operations.

use crate::interval::Timestamp;
use thiserror::Error;

/// A convenience `Result` type for timeline operations.
pub type Result<T> = std::result::Result<T, IndexError>;

/// The error type for interval index operations.
///
/// Ordinary misuse (adding a duplicate id, removing an absent interval,
/// querying an empty index) is not an error and never produces one of these.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    /// Interval ends before it starts.
    #[error("Inverted interval: end {end} is before start {start}")]
    InvertedInterval {
        /// Start of the rejected interval.
        start: Timestamp,
        /// End of the rejected interval.
        end: Timestamp,
    },

    /// Query window ends before it starts.
    #[error("Invalid timespan: start {start} is after end {end}")]
    InvalidTimespan {
        /// Requested start.
        start: Timestamp,
        /// Requested end.
        end: Timestamp,
    },

    /// The partition tree does not reflect the latest mutations.
    #[error("Partition tree is stale, build() must run before a read-only query")]
    StaleTree,

    /// A retention cutoff does not fit in a timestamp.
    #[error("Retention window overflow: now {now} offset by {offset_ms}ms")]
    WindowOverflow {
        /// Reference time the window was computed from.
        now: Timestamp,
        /// Signed offset that overflowed.
        offset_ms: i128,
    },
}
