//! Contiguous-range expansion around a matched record.
//!
//! A search lands somewhere inside a run of records sharing a calendar
//! day or month; crawling walks outward one position at a time to find
//! the run's boundary in a given direction.

use crate::{Direction, Granularity, RecordStore};
use chrono::{Datelike, NaiveDateTime};

/// Return the farthest position from `start` in `direction` such that
/// every record between `start` and the result shares the start record's
/// calendar day or month-of-year.
///
/// Stops at store boundaries. Crawling both directions from the same
/// start yields the inclusive same-group range; when both collapse to
/// `start` the range is the singleton `[start]`.
///
/// `start` must be a valid position in a non-empty store.
pub fn crawl(
    store: &RecordStore,
    start: usize,
    direction: Direction,
    granularity: Granularity,
) -> usize {
    let records = store.records();
    debug_assert!(start < records.len());

    let mut current = start;
    loop {
        let next = match direction {
            Direction::Later => {
                if current + 1 == records.len() {
                    return current;
                }
                current + 1
            }
            Direction::Earlier => {
                if current == 0 {
                    return current;
                }
                current - 1
            }
        };

        if !same_group(records[current].taken_at, records[next].taken_at, granularity) {
            return current;
        }
        current = next;
    }
}

fn same_group(current: NaiveDateTime, next: NaiveDateTime, granularity: Granularity) -> bool {
    match granularity {
        Granularity::Day => current.date() == next.date(),
        // Month-of-year comparison; the year is not consulted.
        Granularity::Month => current.month() == next.month(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VitalRecord;
    use chrono::NaiveDate;

    fn record(y: i32, m: u32, d: u32, h: u32) -> VitalRecord {
        let mut record = VitalRecord::at(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap(),
        );
        record.glucose = Some(5.5);
        record
    }

    fn span(store: &RecordStore, start: usize, granularity: Granularity) -> (usize, usize) {
        (
            crawl(store, start, Direction::Earlier, granularity),
            crawl(store, start, Direction::Later, granularity),
        )
    }

    #[test]
    fn test_day_crawl_spans_exactly_the_same_day_run() {
        let store = RecordStore::from_records(vec![
            record(2024, 1, 5, 8),
            record(2024, 1, 5, 20),
            record(2024, 2, 10, 8),
        ])
        .unwrap();

        // From either same-day position the crawl spans both and no more.
        assert_eq!(span(&store, 0, Granularity::Day), (0, 1));
        assert_eq!(span(&store, 1, Granularity::Day), (0, 1));
        assert_eq!(span(&store, 2, Granularity::Day), (2, 2));
    }

    #[test]
    fn test_month_crawl_groups_a_whole_month() {
        let store = RecordStore::from_records(vec![
            record(2024, 1, 5, 8),
            record(2024, 2, 1, 8),
            record(2024, 2, 10, 8),
            record(2024, 2, 28, 8),
            record(2024, 3, 1, 8),
        ])
        .unwrap();

        assert_eq!(span(&store, 2, Granularity::Month), (1, 3));
        assert_eq!(span(&store, 0, Granularity::Month), (0, 0));
    }

    #[test]
    fn test_singleton_range_collapses_to_start() {
        let store = RecordStore::from_records(vec![record(2024, 1, 5, 8)]).unwrap();
        assert_eq!(span(&store, 0, Granularity::Day), (0, 0));
        assert_eq!(span(&store, 0, Granularity::Month), (0, 0));
    }

    #[test]
    fn test_month_crawl_compares_month_of_year_only() {
        // Adjacent Decembers from different years form one run: the
        // crawler compares the month-of-year field, not the year.
        let store = RecordStore::from_records(vec![
            record(2023, 12, 30, 8),
            record(2024, 12, 1, 8),
        ])
        .unwrap();

        assert_eq!(span(&store, 0, Granularity::Month), (0, 1));
    }

    #[test]
    fn test_crawl_stops_at_store_boundaries() {
        let store = RecordStore::from_records(vec![
            record(2024, 1, 5, 8),
            record(2024, 1, 5, 12),
            record(2024, 1, 5, 20),
        ])
        .unwrap();

        assert_eq!(crawl(&store, 1, Direction::Earlier, Granularity::Day), 0);
        assert_eq!(crawl(&store, 1, Direction::Later, Granularity::Day), 2);
    }
}
