//! Timeframe selection: composing search, crawl, and explicit windows.

use crate::crawl::crawl;
use crate::{Direction, Granularity, RecordStore};

/// Caller-selected window over the store's positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeframeMode {
    /// The entire store
    All,
    /// One explicit position (the latest record, or a search result)
    Single(usize),
    /// All records sharing the start position's calendar day
    SameDay(usize),
    /// All records sharing the start position's month
    SameMonth(usize),
    /// A contiguous window of `count` positions ending at `end`,
    /// clamped to the earliest available position
    Before { end: usize, count: usize },
}

/// An ordered set of positions selected by [`select_timeframe`], plus
/// caller feedback about the selection.
#[derive(Clone, Debug, PartialEq)]
pub struct Window {
    pub positions: Vec<usize>,
    /// Set when a `Before` request exceeded the available history and
    /// was clamped; a notice for the caller, never an error.
    pub clamp_notice: Option<String>,
}

impl Window {
    /// The count actually selected.
    pub fn selected(&self) -> usize {
        self.positions.len()
    }
}

/// Produce the window of positions for the requested mode.
///
/// Positions passed in `Single`, `SameDay`, `SameMonth`, and `Before`
/// must be valid for the store (a prior search result).
pub fn select_timeframe(store: &RecordStore, mode: TimeframeMode) -> Window {
    let (positions, clamp_notice) = match mode {
        TimeframeMode::All => ((0..store.len()).collect(), None),

        TimeframeMode::Single(position) => (vec![position], None),

        TimeframeMode::SameDay(position) => {
            (expand(store, position, Granularity::Day), None)
        }

        TimeframeMode::SameMonth(position) => {
            (expand(store, position, Granularity::Month), None)
        }

        TimeframeMode::Before { end, count } => {
            let available = end + 1;
            let (count, notice) = if count > available {
                let notice = format!(
                    "There are only {available} record(s) up to this one; showing all {available}."
                );
                (available, Some(notice))
            } else {
                (count, None)
            };
            (((end + 1 - count)..=end).collect(), notice)
        }
    };

    Window {
        positions,
        clamp_notice,
    }
}

fn expand(store: &RecordStore, start: usize, granularity: Granularity) -> Vec<usize> {
    let first = crawl(store, start, Direction::Earlier, granularity);
    let last = crawl(store, start, Direction::Later, granularity);
    (first..=last).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VitalRecord;
    use chrono::NaiveDate;

    fn record(m: u32, d: u32, h: u32) -> VitalRecord {
        let mut record = VitalRecord::at(
            NaiveDate::from_ymd_opt(2024, m, d)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap(),
        );
        record.systolic = Some(120);
        record.diastolic = Some(80);
        record
    }

    fn sample_store() -> RecordStore {
        RecordStore::from_records(vec![record(1, 5, 8), record(1, 5, 20), record(2, 10, 8)])
            .unwrap()
    }

    #[test]
    fn test_all_selects_every_position() {
        let store = sample_store();
        let window = select_timeframe(&store, TimeframeMode::All);

        assert_eq!(window.positions, vec![0, 1, 2]);
        assert_eq!(window.selected(), 3);
        assert!(window.clamp_notice.is_none());
    }

    #[test]
    fn test_single_selects_one_position() {
        let store = sample_store();
        let window = select_timeframe(&store, TimeframeMode::Single(2));

        assert_eq!(window.positions, vec![2]);
    }

    #[test]
    fn test_same_day_spans_the_run_from_either_end() {
        let store = sample_store();

        for start in [0, 1] {
            let window = select_timeframe(&store, TimeframeMode::SameDay(start));
            assert_eq!(window.positions, vec![0, 1]);
        }

        let window = select_timeframe(&store, TimeframeMode::SameDay(2));
        assert_eq!(window.positions, vec![2]);
    }

    #[test]
    fn test_same_month_spans_the_month_run() {
        let store = RecordStore::from_records(vec![
            record(1, 5, 8),
            record(2, 1, 8),
            record(2, 20, 8),
            record(3, 1, 8),
        ])
        .unwrap();

        let window = select_timeframe(&store, TimeframeMode::SameMonth(2));
        assert_eq!(window.positions, vec![1, 2]);
    }

    #[test]
    fn test_before_within_history() {
        let store = sample_store();
        let window = select_timeframe(&store, TimeframeMode::Before { end: 2, count: 2 });

        assert_eq!(window.positions, vec![1, 2]);
        assert!(window.clamp_notice.is_none());
    }

    #[test]
    fn test_before_clamps_with_notice_instead_of_failing() {
        let store = sample_store();
        let window = select_timeframe(&store, TimeframeMode::Before { end: 2, count: 10 });

        assert_eq!(window.positions, vec![0, 1, 2]);
        let notice = window.clamp_notice.expect("clamp should be reported");
        assert!(notice.contains("only 3"));
    }

    #[test]
    fn test_before_count_one_is_the_end_position() {
        let store = sample_store();
        let window = select_timeframe(&store, TimeframeMode::Before { end: 1, count: 1 });

        assert_eq!(window.positions, vec![1]);
    }
}
