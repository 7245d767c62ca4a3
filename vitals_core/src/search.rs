//! Binary date search over the sorted record store.
//!
//! The search tracks `[low, high]` position bounds against the original
//! store rather than shrinking a working copy, so no rows are cloned.
//! When the caller asks for date-level matching the stored timestamp is
//! truncated to its calendar date before comparison.

use crate::{DateMatch, Error, RecordStore, Result};
use chrono::NaiveDateTime;
use std::cmp::Ordering;

/// Probe budget for a single search. A sorted store converges within
/// `log2(n)` probes, so running out means the ordering is corrupt.
const MAX_PROBES: u32 = 1000;

/// Find the position of a record matching the target date or datetime.
///
/// When several records share the target's calendar date, the position
/// returned is whichever probe satisfied equality; it is not guaranteed
/// to be the first or last of the same-day run. Callers that need the
/// whole run follow up with [`crate::crawl::crawl`].
pub fn find_record(
    store: &RecordStore,
    target: NaiveDateTime,
    match_on: DateMatch,
) -> Result<usize> {
    if store.is_empty() {
        return Err(Error::NotFound);
    }

    let records = store.records();
    let mut low = 0usize;
    let mut high = records.len() - 1;
    let mut probes = 0u32;

    while low <= high {
        probes += 1;
        if probes > MAX_PROBES {
            tracing::warn!(
                "Search exceeded {} probes; store ordering is suspect",
                MAX_PROBES
            );
            return Err(Error::SearchLimit);
        }

        let middle = low + (high - low) / 2;
        match compare(records[middle].taken_at, target, match_on) {
            Ordering::Greater => {
                // Overshot: disregard the middle and everything after it.
                if middle == 0 {
                    break;
                }
                high = middle - 1;
            }
            Ordering::Less => {
                // Not there yet: disregard the middle and everything before it.
                low = middle + 1;
            }
            Ordering::Equal => {
                tracing::debug!("Search matched {} at position {}", target, middle);
                return Ok(middle);
            }
        }
    }

    Err(Error::NotFound)
}

fn compare(stored: NaiveDateTime, target: NaiveDateTime, match_on: DateMatch) -> Ordering {
    match match_on {
        DateMatch::DateOnly => stored.date().cmp(&target.date()),
        DateMatch::Exact => stored.cmp(&target),
    }
}
