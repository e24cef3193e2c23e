//! Retention window for trimming an index around the current time.

use crate::error::{IndexError, Result};
use crate::index::IntervalIndex;
use crate::interval::{Interval, Timespan, Timestamp};
use std::time::Duration;
use tracing::debug;

/// Default span of history kept behind now: 7 days.
pub const DEFAULT_PAST_RETENTION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Default span kept ahead of now: 90 days.
pub const DEFAULT_FUTURE_HORIZON: Duration = Duration::from_secs(90 * 24 * 60 * 60);

/// Policy deciding which part of the timeline an index keeps.
///
/// Timestamps are interpreted as epoch milliseconds.
pub trait WindowPolicy: Send + Sync {
    /// How far behind now intervals are kept.
    fn past_retention(&self) -> Duration;

    /// How far ahead of now intervals are kept.
    fn future_horizon(&self) -> Duration;

    /// Intervals ending at or before this instant are expired.
    fn past_cutoff(&self, now: Timestamp) -> Result<Timestamp> {
        shift(now, -(self.past_retention().as_millis() as i128))
    }

    /// Intervals starting after this instant are beyond the horizon.
    fn future_cutoff(&self, now: Timestamp) -> Result<Timestamp> {
        shift(now, self.future_horizon().as_millis() as i128)
    }
}

/// Default window policy (7 days back, 90 days ahead).
#[derive(Debug, Clone)]
pub struct DefaultWindowPolicy {
    past: Duration,
    future: Duration,
}

impl Default for DefaultWindowPolicy {
    fn default() -> Self {
        Self {
            past: DEFAULT_PAST_RETENTION,
            future: DEFAULT_FUTURE_HORIZON,
        }
    }
}

impl DefaultWindowPolicy {
    /// Creates a window policy with custom spans.
    pub fn new(past: Duration, future: Duration) -> Self {
        Self { past, future }
    }
}

impl WindowPolicy for DefaultWindowPolicy {
    fn past_retention(&self) -> Duration {
        self.past
    }

    fn future_horizon(&self) -> Duration {
        self.future
    }
}

/// Counts of intervals dropped by one window application.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PruneReport {
    /// Intervals that ended at or before the past cutoff.
    pub past_removed: usize,
    /// Intervals that started after the future cutoff.
    pub future_removed: usize,
}

impl PruneReport {
    /// Total intervals removed.
    pub fn total(&self) -> usize {
        self.past_removed + self.future_removed
    }
}

/// Applies a [`WindowPolicy`] to interval indices.
#[derive(Debug, Clone, Default)]
pub struct RetentionWindow<P: WindowPolicy> {
    policy: P,
}

impl<P: WindowPolicy> RetentionWindow<P> {
    /// Creates a new retention window.
    pub fn new(policy: P) -> Self {
        Self { policy }
    }

    /// Returns the policy.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Returns the window retained at `now`.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::WindowOverflow` if either bound does not fit in a
    /// timestamp.
    pub fn window(&self, now: Timestamp) -> Result<Timespan> {
        Ok(Timespan::new(
            self.policy.past_cutoff(now)?,
            self.policy.future_cutoff(now)?,
        ))
    }

    /// Drops every interval of `index` that falls outside the window at `now`.
    ///
    /// Both cutoffs are computed before anything is removed, so an overflow
    /// leaves the index untouched.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::WindowOverflow` if either bound does not fit in a
    /// timestamp.
    pub fn apply<T: Interval>(
        &self,
        index: &mut IntervalIndex<T>,
        now: Timestamp,
    ) -> Result<PruneReport> {
        let window = self.window(now)?;
        let report = PruneReport {
            past_removed: index.remove_past_intervals(window.start),
            future_removed: index.remove_future_intervals(window.end),
        };

        debug!(
            "Applied retention window [{}, {}]: {} past, {} future intervals removed",
            window.start, window.end, report.past_removed, report.future_removed
        );
        Ok(report)
    }
}

fn shift(now: Timestamp, offset_ms: i128) -> Result<Timestamp> {
    Timestamp::try_from(i128::from(now) + offset_ms)
        .map_err(|_| IndexError::WindowOverflow { now, offset_ms })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Busytime;

    const HOUR_MS: Timestamp = 60 * 60 * 1000;

    #[derive(Debug, Clone)]
    struct FixedPolicy(Duration, Duration);

    impl WindowPolicy for FixedPolicy {
        fn past_retention(&self) -> Duration {
            self.0
        }

        fn future_horizon(&self) -> Duration {
            self.1
        }
    }

    #[test]
    fn test_default_policy() {
        let policy = DefaultWindowPolicy::default();
        assert_eq!(policy.past_retention(), Duration::from_secs(7 * 24 * 3600));
        assert_eq!(policy.future_horizon(), Duration::from_secs(90 * 24 * 3600));
    }

    #[test]
    fn test_cutoff_boundaries() {
        let policy = FixedPolicy(Duration::from_secs(3600), Duration::from_secs(7200));
        let now = 10 * HOUR_MS;

        assert_eq!(policy.past_cutoff(now).unwrap(), 9 * HOUR_MS);
        assert_eq!(policy.future_cutoff(now).unwrap(), 12 * HOUR_MS);
    }

    #[test]
    fn test_cutoff_overflow() {
        let policy = FixedPolicy(Duration::from_secs(1), Duration::from_secs(1));

        assert!(matches!(
            policy.future_cutoff(Timestamp::MAX),
            Err(IndexError::WindowOverflow { .. })
        ));
        assert!(matches!(
            policy.past_cutoff(Timestamp::MIN),
            Err(IndexError::WindowOverflow { .. })
        ));
    }

    #[test]
    fn test_apply_trims_both_sides() {
        let window = RetentionWindow::new(FixedPolicy(
            Duration::from_secs(3600),
            Duration::from_secs(3600),
        ));
        let now = 10 * HOUR_MS;

        let mut index = IntervalIndex::new();
        // ends exactly at the past cutoff: expired
        index
            .add(Busytime::new("old", "e", "c", 8 * HOUR_MS, 9 * HOUR_MS))
            .unwrap();
        // ends one ms after the cutoff: kept
        index
            .add(Busytime::new("recent", "e", "c", 8 * HOUR_MS, 9 * HOUR_MS + 1))
            .unwrap();
        // starts exactly at the future cutoff: kept
        index
            .add(Busytime::new("soon", "e", "c", 11 * HOUR_MS, 12 * HOUR_MS))
            .unwrap();
        index
            .add(Busytime::new("later", "e", "c", 11 * HOUR_MS + 1, 12 * HOUR_MS))
            .unwrap();

        let report = window.apply(&mut index, now).unwrap();
        assert_eq!(
            report,
            PruneReport {
                past_removed: 1,
                future_removed: 1
            }
        );
        assert_eq!(report.total(), 2);

        let kept: Vec<&str> = index.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(kept, vec!["recent", "soon"]);
    }

    #[test]
    fn test_apply_overflow_leaves_index() {
        let window = RetentionWindow::new(DefaultWindowPolicy::default());
        let mut index = IntervalIndex::new();
        index.add(Busytime::new("a", "e", "c", 0, 10)).unwrap();

        assert!(window.apply(&mut index, Timestamp::MAX).is_err());
        assert_eq!(index.len(), 1);
    }
}
