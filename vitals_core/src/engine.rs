//! Transactional add/edit/remove over the record store.
//!
//! Every mutating operation snapshots the store on entry and restores it
//! on any failure, so a half-applied edit is never visible to the caller.
//! The same snapshot primitive, taken once at load time, backs the
//! session-level undo.

use crate::search::find_record;
use crate::{
    DateMatch, Error, LimitsConfig, RecordChanges, RecordStore, Result, VitalRecord,
};
use chrono::NaiveDateTime;

const TIMESTAMP_DISPLAY: &str = "%Y-%m-%d %H:%M";

/// Outcome of a remove request.
#[derive(Clone, Debug, PartialEq)]
pub enum RemoveOutcome {
    /// The record was deleted; carries a status message for display.
    Removed(String),
    /// The caller did not confirm; the store is untouched.
    Declined(String),
}

/// One editing session over a loaded record store.
///
/// Holds the live store, the snapshot taken at load time (for undo-all),
/// and the plausible-value limits records are validated against.
#[derive(Clone, Debug)]
pub struct VitalsSession {
    store: RecordStore,
    session_backup: RecordStore,
    limits: LimitsConfig,
}

impl VitalsSession {
    /// Build a session from loaded records.
    ///
    /// The records are sorted and integrity-checked; the resulting store
    /// is also kept aside as the session backup for [`Self::undo_all`].
    pub fn new(records: Vec<VitalRecord>, limits: LimitsConfig) -> Result<Self> {
        let store = RecordStore::from_records(records)?;
        let session_backup = store.snapshot();
        Ok(Self {
            store,
            session_backup,
            limits,
        })
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Add a record.
    ///
    /// Duplicate detection matches the full timestamp, not just the date:
    /// two readings on the same day are fine, two at the same minute are
    /// not. Returns a status message for display.
    pub fn add(&mut self, record: VitalRecord) -> Result<String> {
        let backup = self.store.snapshot();
        match self.try_add(record) {
            Ok(message) => Ok(message),
            Err(error) => {
                self.store = backup;
                Err(error)
            }
        }
    }

    fn try_add(&mut self, mut record: VitalRecord) -> Result<String> {
        record.glucose = record.glucose.map(round_to_tenth);
        self.limits.validate(&record)?;
        self.reject_existing_timestamp(record.taken_at)?;

        let taken_at = record.taken_at;
        self.store.insert(record);

        tracing::info!("Added record for {}", taken_at);
        Ok(format!(
            "The record for {} has been added.",
            taken_at.format(TIMESTAMP_DISPLAY)
        ))
    }

    /// Apply field-by-field updates to the record at `position`.
    ///
    /// The not-all-empty invariant and the plausible ranges are
    /// re-validated after all updates; the store is re-sorted when the
    /// timestamp changed. Any failure leaves the store untouched.
    pub fn edit(&mut self, position: usize, changes: RecordChanges) -> Result<String> {
        let backup = self.store.snapshot();
        match self.try_edit(position, changes) {
            Ok(message) => Ok(message),
            Err(error) => {
                self.store = backup;
                Err(error)
            }
        }
    }

    fn try_edit(&mut self, position: usize, changes: RecordChanges) -> Result<String> {
        let current = self.store.get(position).ok_or(Error::NotFound)?.clone();

        let mut updated = current.clone();
        if let Some(date) = changes.date {
            updated.taken_at = NaiveDateTime::new(date, updated.taken_at.time());
        }
        if let Some(time) = changes.time {
            updated.taken_at = NaiveDateTime::new(updated.taken_at.date(), time);
        }
        if let Some(systolic) = changes.systolic {
            updated.systolic = systolic;
        }
        if let Some(diastolic) = changes.diastolic {
            updated.diastolic = diastolic;
        }
        if let Some(pulse) = changes.pulse {
            updated.pulse = pulse;
        }
        if let Some(glucose) = changes.glucose {
            updated.glucose = glucose;
        }
        updated.glucose = updated.glucose.map(round_to_tenth);

        self.limits.validate(&updated)?;
        if updated.taken_at != current.taken_at {
            self.reject_existing_timestamp(updated.taken_at)?;
        }

        let taken_at = updated.taken_at;
        self.store.replace(position, updated);

        tracing::info!("Edited record for {}", current.taken_at);
        Ok(format!(
            "The record for {} has been edited.",
            taken_at.format(TIMESTAMP_DISPLAY)
        ))
    }

    /// Delete the record at `position` once the caller has confirmed.
    ///
    /// Without confirmation the store is untouched and the no-op is
    /// reported in the outcome rather than as an error.
    pub fn remove(&mut self, position: usize, confirmed: bool) -> Result<RemoveOutcome> {
        let record = self.store.get(position).ok_or(Error::NotFound)?;
        let taken_at = record.taken_at;

        if !confirmed {
            return Ok(RemoveOutcome::Declined(format!(
                "The record for {} will not be removed.",
                taken_at.format(TIMESTAMP_DISPLAY)
            )));
        }

        self.store.remove(position);

        tracing::info!("Removed record for {}", taken_at);
        Ok(RemoveOutcome::Removed(format!(
            "The record for {} has been removed.",
            taken_at.format(TIMESTAMP_DISPLAY)
        )))
    }

    /// Restore the store to the snapshot captured at load time,
    /// discarding all of the session's accumulated mutations.
    pub fn undo_all(&mut self) -> String {
        self.store = self.session_backup.snapshot();
        tracing::info!("Restored the session backup");
        "All changes have been undone; the original records have been restored.".to_string()
    }

    fn reject_existing_timestamp(&self, taken_at: NaiveDateTime) -> Result<()> {
        match find_record(&self.store, taken_at, DateMatch::Exact) {
            Ok(_) => Err(Error::Duplicate(taken_at)),
            Err(Error::NotFound) => Ok(()),
            Err(error) => Err(error),
        }
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
