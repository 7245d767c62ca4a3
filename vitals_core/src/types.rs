//! Core domain types for the myVitals record engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Vital-sign records and field-by-field edit descriptions
//! - Matching granularities for date search
//! - Crawl directions and calendar granularities

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

// ============================================================================
// Record Types
// ============================================================================

/// One timestamped vital-sign measurement event.
///
/// Every measurement field is optional, but a record with all of them
/// absent is invalid and is rejected by the mutation engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VitalRecord {
    /// When the reading was taken. Unique within a store.
    pub taken_at: NaiveDateTime,
    /// Systolic blood pressure, mmHg
    pub systolic: Option<u16>,
    /// Diastolic blood pressure, mmHg
    pub diastolic: Option<u16>,
    /// Pulse rate, bpm
    pub pulse: Option<u16>,
    /// Blood glucose, mmol/L, one decimal place
    pub glucose: Option<f64>,
}

impl VitalRecord {
    /// Create a record with the given timestamp and no measurements yet.
    pub fn at(taken_at: NaiveDateTime) -> Self {
        Self {
            taken_at,
            systolic: None,
            diastolic: None,
            pulse: None,
            glucose: None,
        }
    }

    /// True when every measurement field is absent.
    pub fn is_empty(&self) -> bool {
        self.systolic.is_none()
            && self.diastolic.is_none()
            && self.pulse.is_none()
            && self.glucose.is_none()
    }
}

/// Field-by-field updates applied by an edit.
///
/// The outer `Option` distinguishes "leave unchanged" (`None`) from an
/// update; for measurement fields the inner `Option` distinguishes setting
/// a value (`Some(Some(v))`) from clearing it (`Some(None)`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordChanges {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub systolic: Option<Option<u16>>,
    pub diastolic: Option<Option<u16>>,
    pub pulse: Option<Option<u16>>,
    pub glucose: Option<Option<f64>>,
}

impl RecordChanges {
    /// True when no field would be touched.
    pub fn is_noop(&self) -> bool {
        self.date.is_none()
            && self.time.is_none()
            && self.systolic.is_none()
            && self.diastolic.is_none()
            && self.pulse.is_none()
            && self.glucose.is_none()
    }
}

// ============================================================================
// Search and Crawl Parameters
// ============================================================================

/// Granularity used when matching a stored timestamp against a target.
///
/// Most view flows match on the calendar date alone; duplicate detection
/// during add/edit matches the full date and time. The distinction is an
/// explicit parameter so it is visible at every call site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateMatch {
    /// Compare calendar dates, ignoring the time of day
    DateOnly,
    /// Compare full timestamps
    Exact,
}

/// Direction of a contiguous crawl from a confirmed position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Towards position 0
    Earlier,
    /// Towards the end of the store
    Later,
}

/// Calendar unit compared by the crawler to decide whether adjacent
/// records belong to the same group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Granularity {
    /// Same calendar day
    Day,
    /// Same month-of-year (the year is not consulted)
    Month,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn timestamp(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_empty_record_detection() {
        let mut record = VitalRecord::at(timestamp(2024, 3, 1));
        assert!(record.is_empty());

        record.pulse = Some(70);
        assert!(!record.is_empty());
    }

    #[test]
    fn test_changes_noop_detection() {
        let changes = RecordChanges::default();
        assert!(changes.is_noop());

        let changes = RecordChanges {
            pulse: Some(None),
            ..RecordChanges::default()
        };
        assert!(!changes.is_noop());
    }
}
