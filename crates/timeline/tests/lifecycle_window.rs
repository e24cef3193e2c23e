//! Integration tests for trimming an index to a retention window.

use alopex_timeline::lifecycle::{DefaultWindowPolicy, PruneReport, RetentionWindow, WindowPolicy};
use alopex_timeline::{Busytime, IndexError, IntervalIndex, Timespan, Timestamp};
use std::time::Duration;

const DAY_MS: Timestamp = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone)]
struct OneDayWindow;

impl WindowPolicy for OneDayWindow {
    fn past_retention(&self) -> Duration {
        Duration::from_secs(24 * 60 * 60)
    }

    fn future_horizon(&self) -> Duration {
        Duration::from_secs(24 * 60 * 60)
    }
}

#[test]
fn test_window_sweep_keeps_queries_consistent() {
    let now = 100 * DAY_MS;
    let mut index = IntervalIndex::new();
    for day in 95..106 {
        index
            .add(Busytime::new(
                format!("bt-{day}"),
                "daily-standup",
                "work",
                day * DAY_MS,
                day * DAY_MS + DAY_MS / 2,
            ))
            .unwrap();
    }
    let all = Timespan::new(0, 200 * DAY_MS);
    assert_eq!(index.query(all).len(), 11);

    let window = RetentionWindow::new(OneDayWindow);
    assert_eq!(
        window.window(now).unwrap(),
        Timespan::new(99 * DAY_MS, 101 * DAY_MS)
    );

    let report = window.apply(&mut index, now).unwrap();
    // days 95..=98 end before the past cutoff, 102..=105 start after the horizon
    assert_eq!(
        report,
        PruneReport {
            past_removed: 4,
            future_removed: 4
        }
    );
    assert!(!index.is_synced());

    let kept: Vec<&str> = index
        .query(all)
        .into_iter()
        .map(|item| item.id.as_str())
        .collect();
    assert_eq!(kept, vec!["bt-99", "bt-100", "bt-101"]);

    // a second sweep at the same instant is a no-op and keeps the tree current
    let report = window.apply(&mut index, now).unwrap();
    assert_eq!(report.total(), 0);
    assert!(index.is_synced());
}

#[test]
fn test_default_window_overflow_is_reported() {
    let window = RetentionWindow::new(DefaultWindowPolicy::default());
    let mut index: IntervalIndex<Busytime> = IntervalIndex::new();

    let err = window.apply(&mut index, Timestamp::MIN).unwrap_err();
    assert!(matches!(err, IndexError::WindowOverflow { now, .. } if now == Timestamp::MIN));
}
