//! In-memory record store, always sorted by timestamp.
//!
//! Positions are the contiguous `0..n-1` indices into the sorted sequence;
//! every mutation re-sorts so positions stay ascending by timestamp.
//! A deep copy of the store (`snapshot`) is the single restore primitive,
//! used both per mutating operation and for session-level undo.

use crate::{Error, Result, VitalRecord};

/// An ordered collection of vital-sign records keyed by position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordStore {
    records: Vec<VitalRecord>,
}

impl RecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from loaded records, sorting by timestamp.
    ///
    /// Duplicate timestamps in the input are a data-integrity error,
    /// reported rather than silently fixed.
    pub fn from_records(mut records: Vec<VitalRecord>) -> Result<Self> {
        records.sort_by_key(|r| r.taken_at);

        if let Some(pair) = records.windows(2).find(|w| w[0].taken_at == w[1].taken_at) {
            return Err(Error::Integrity(format!(
                "two records share the timestamp {}",
                pair[0].taken_at
            )));
        }

        tracing::debug!("Built store with {} record(s)", records.len());
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The record at a position, if the position exists.
    pub fn get(&self, position: usize) -> Option<&VitalRecord> {
        self.records.get(position)
    }

    /// The sorted records, positions implied by index.
    pub fn records(&self) -> &[VitalRecord] {
        &self.records
    }

    /// The position of the latest record, if any.
    pub fn last_position(&self) -> Option<usize> {
        self.records.len().checked_sub(1)
    }

    /// Deep copy of the store. Restore by assigning the copy back.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    /// Insert a record and re-sort, assigning fresh contiguous positions.
    /// Timestamp uniqueness is the caller's responsibility.
    pub(crate) fn insert(&mut self, record: VitalRecord) {
        self.records.push(record);
        self.resort();
    }

    /// Replace the record at a position and re-sort.
    pub(crate) fn replace(&mut self, position: usize, record: VitalRecord) {
        self.records[position] = record;
        self.resort();
    }

    /// Delete the record at a position and re-sort.
    pub(crate) fn remove(&mut self, position: usize) -> VitalRecord {
        let removed = self.records.remove(position);
        self.resort();
        removed
    }

    fn resort(&mut self) {
        self.records.sort_by_key(|r| r.taken_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn timestamp(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn record(d: u32, h: u32) -> VitalRecord {
        let mut record = VitalRecord::at(timestamp(d, h));
        record.pulse = Some(70);
        record
    }

    fn assert_sorted(store: &RecordStore) {
        assert!(store
            .records()
            .windows(2)
            .all(|w| w[0].taken_at < w[1].taken_at));
    }

    #[test]
    fn test_from_records_sorts_by_timestamp() {
        let store =
            RecordStore::from_records(vec![record(9, 8), record(2, 8), record(5, 8)]).unwrap();

        assert_eq!(store.len(), 3);
        assert_sorted(&store);
        assert_eq!(store.get(0).unwrap().taken_at, timestamp(2, 8));
        assert_eq!(store.last_position(), Some(2));
    }

    #[test]
    fn test_from_records_rejects_duplicate_timestamps() {
        let result = RecordStore::from_records(vec![record(2, 8), record(2, 8)]);
        assert!(matches!(result, Err(Error::Integrity(_))));
    }

    #[test]
    fn test_insert_keeps_positions_contiguous_and_sorted() {
        let mut store = RecordStore::from_records(vec![record(2, 8), record(9, 8)]).unwrap();

        store.insert(record(5, 8));

        assert_eq!(store.len(), 3);
        assert_sorted(&store);
        assert_eq!(store.get(1).unwrap().taken_at, timestamp(5, 8));
    }

    #[test]
    fn test_replace_resorts_when_timestamp_moves() {
        let mut store =
            RecordStore::from_records(vec![record(2, 8), record(5, 8), record(9, 8)]).unwrap();

        let mut moved = record(5, 8);
        moved.taken_at = timestamp(12, 8);
        store.replace(1, moved);

        assert_sorted(&store);
        assert_eq!(store.get(2).unwrap().taken_at, timestamp(12, 8));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut store =
            RecordStore::from_records(vec![record(2, 8), record(5, 8), record(9, 8)]).unwrap();

        let removed = store.remove(1);

        assert_eq!(removed.taken_at, timestamp(5, 8));
        assert_eq!(store.len(), 2);
        assert_sorted(&store);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let store = RecordStore::from_records(vec![record(2, 8)]).unwrap();
        let snapshot = store.snapshot();

        let mut mutated = store.clone();
        mutated.insert(record(5, 8));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot, store);
    }
}
