//! Interval and timespan value types shared by the index and its callers.
//!
//! Every overlap decision in this crate goes through [`overlaps`], which uses
//! half-open semantics: two ranges that merely touch (one ends exactly where
//! the other starts) do not overlap.

use crate::error::{IndexError, Result};
use std::fmt::Debug;
use std::hash::Hash;

/// Instant on the timeline. Calendar callers use epoch milliseconds.
pub type Timestamp = i64;

/// Returns true if `[a_start, a_end)` and `[b_start, b_end)` intersect.
#[inline]
pub fn overlaps(
    a_start: Timestamp,
    a_end: Timestamp,
    b_start: Timestamp,
    b_end: Timestamp,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// A record with a start, an end and a stable identity.
///
/// The index only ever looks at these three properties plus any grouping
/// fields exposed through [`Interval::field`]; the rest of the record is
/// opaque payload.
///
/// # Preconditions
///
/// `start() <= end()` must hold and all three accessors must return the same
/// values for as long as the record is stored in an index.
pub trait Interval {
    /// Identity type. Two records with equal ids are the same record.
    type Id: Eq + Hash + Clone + Debug;

    /// Returns the identity of this record.
    fn id(&self) -> &Self::Id;

    /// Returns the start instant.
    fn start(&self) -> Timestamp;

    /// Returns the end instant.
    fn end(&self) -> Timestamp;

    /// Returns the value of a named grouping field, if this record has one.
    ///
    /// Used by secondary indices. Records without groupable fields can rely
    /// on the default, which reports no value for every key.
    fn field(&self, _key: &str) -> Option<IndexValue> {
        None
    }
}

/// Value a secondary index groups records by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndexValue {
    /// String field (calendar ids, event ids).
    Str(String),
    /// Integer field.
    Int(i64),
    /// Boolean field.
    Bool(bool),
}

impl From<&str> for IndexValue {
    fn from(value: &str) -> Self {
        IndexValue::Str(value.to_string())
    }
}

impl From<String> for IndexValue {
    fn from(value: String) -> Self {
        IndexValue::Str(value)
    }
}

impl From<i64> for IndexValue {
    fn from(value: i64) -> Self {
        IndexValue::Int(value)
    }
}

impl From<bool> for IndexValue {
    fn from(value: bool) -> Self {
        IndexValue::Bool(value)
    }
}

/// An immutable `(start, end)` query window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timespan {
    /// Start of the window.
    pub start: Timestamp,
    /// End of the window (exclusive for overlap tests).
    pub end: Timestamp,
}

impl Timespan {
    /// Creates a new timespan without validating `start <= end`.
    pub const fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    /// Creates a new timespan, rejecting windows that end before they start.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidTimespan` if `start > end`.
    pub fn try_new(start: Timestamp, end: Timestamp) -> Result<Self> {
        if start > end {
            return Err(IndexError::InvalidTimespan { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the length of the window, saturating at `Timestamp::MAX`.
    pub fn duration(&self) -> Timestamp {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if `ts` lies in `[start, end)`.
    pub fn contains(&self, ts: Timestamp) -> bool {
        ts >= self.start && ts < self.end
    }

    /// Returns true if the two windows overlap.
    pub fn overlaps(&self, other: &Timespan) -> bool {
        overlaps(self.start, self.end, other.start, other.end)
    }

    /// Returns true if `interval` overlaps this window.
    pub fn overlaps_interval<I: Interval + ?Sized>(&self, interval: &I) -> bool {
        overlaps(interval.start(), interval.end(), self.start, self.end)
    }
}

/// Grouping key for [`Busytime::event_id`].
pub const EVENT_ID_FIELD: &str = "eventId";

/// Grouping key for [`Busytime::calendar_id`].
pub const CALENDAR_ID_FIELD: &str = "calendarId";

/// A block of time during which a calendar event occupies its owner.
///
/// Recurring events produce one busytime per occurrence, all sharing the
/// same `event_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Busytime {
    /// Unique busytime id.
    pub id: String,
    /// Event this busytime belongs to.
    pub event_id: String,
    /// Calendar the event lives in.
    pub calendar_id: String,
    /// Start instant (epoch milliseconds).
    pub start: Timestamp,
    /// End instant (epoch milliseconds).
    pub end: Timestamp,
}

impl Busytime {
    /// Creates a new busytime.
    pub fn new(
        id: impl Into<String>,
        event_id: impl Into<String>,
        calendar_id: impl Into<String>,
        start: Timestamp,
        end: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            event_id: event_id.into(),
            calendar_id: calendar_id.into(),
            start,
            end,
        }
    }

    /// Returns the window covered by this busytime.
    pub fn timespan(&self) -> Timespan {
        Timespan::new(self.start, self.end)
    }
}

impl Interval for Busytime {
    type Id = String;

    fn id(&self) -> &String {
        &self.id
    }

    fn start(&self) -> Timestamp {
        self.start
    }

    fn end(&self) -> Timestamp {
        self.end
    }

    fn field(&self, key: &str) -> Option<IndexValue> {
        match key {
            EVENT_ID_FIELD => Some(IndexValue::from(self.event_id.as_str())),
            CALENDAR_ID_FIELD => Some(IndexValue::from(self.calendar_id.as_str())),
            _ => None,
        }
    }
}
