//! Column filtering of windowed rows.
//!
//! A filter projects the selected rows onto a subset of measurement
//! columns (the timestamp is always kept) and drops rows that are empty
//! across every kept column. The store itself is never mutated; the
//! filtered rows are the sole handoff to any rendering collaborator.

use crate::{RecordStore, VitalRecord, Window};

/// A measurement column in the vitals table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    Systolic,
    Diastolic,
    Pulse,
    Glucose,
}

impl Column {
    pub fn name(self) -> &'static str {
        match self {
            Column::Systolic => "systolic",
            Column::Diastolic => "diastolic",
            Column::Pulse => "pulse",
            Column::Glucose => "glucose",
        }
    }

    /// The record's value in this column, rendered for display.
    /// Missing values render as "-".
    pub fn display(self, record: &VitalRecord) -> String {
        let value = match self {
            Column::Systolic => record.systolic.map(|v| v.to_string()),
            Column::Diastolic => record.diastolic.map(|v| v.to_string()),
            Column::Pulse => record.pulse.map(|v| v.to_string()),
            Column::Glucose => record.glucose.map(|v| format!("{v:.1}")),
        };
        value.unwrap_or_else(|| "-".to_string())
    }
}

/// The measurement columns kept by a view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnSet {
    columns: Vec<Column>,
}

impl ColumnSet {
    /// Build a set from an explicit column list, keeping first occurrences.
    pub fn custom(columns: Vec<Column>) -> Self {
        let mut kept = Vec::new();
        for column in columns {
            if !kept.contains(&column) {
                kept.push(column);
            }
        }
        Self { columns: kept }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn contains(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }
}

/// Fixed column presets offered to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnPreset {
    All,
    Glucose,
    BloodPressure,
    Pulse,
    BloodPressurePulse,
}

impl ColumnPreset {
    pub fn column_set(self) -> ColumnSet {
        let columns = match self {
            ColumnPreset::All => vec![
                Column::Systolic,
                Column::Diastolic,
                Column::Pulse,
                Column::Glucose,
            ],
            ColumnPreset::Glucose => vec![Column::Glucose],
            ColumnPreset::BloodPressure => vec![Column::Systolic, Column::Diastolic],
            ColumnPreset::Pulse => vec![Column::Pulse],
            ColumnPreset::BloodPressurePulse => {
                vec![Column::Systolic, Column::Diastolic, Column::Pulse]
            }
        };
        ColumnSet::custom(columns)
    }
}

/// One filtered row: the original position plus the record projected
/// onto the kept columns (dropped measurements are blanked).
#[derive(Clone, Debug, PartialEq)]
pub struct FilteredRow {
    pub position: usize,
    pub record: VitalRecord,
}

/// Project the windowed rows onto the kept columns, dropping rows that
/// have no value in any kept measurement column.
pub fn filter_rows(store: &RecordStore, window: &Window, columns: &ColumnSet) -> Vec<FilteredRow> {
    window
        .positions
        .iter()
        .filter_map(|&position| {
            let record = store.get(position)?;
            let projected = project(record, columns);
            if projected.is_empty() {
                None
            } else {
                Some(FilteredRow {
                    position,
                    record: projected,
                })
            }
        })
        .collect()
}

fn project(record: &VitalRecord, columns: &ColumnSet) -> VitalRecord {
    VitalRecord {
        taken_at: record.taken_at,
        systolic: record.systolic.filter(|_| columns.contains(Column::Systolic)),
        diastolic: record.diastolic.filter(|_| columns.contains(Column::Diastolic)),
        pulse: record.pulse.filter(|_| columns.contains(Column::Pulse)),
        glucose: record.glucose.filter(|_| columns.contains(Column::Glucose)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{select_timeframe, TimeframeMode};
    use chrono::NaiveDate;

    fn record(d: u32, systolic: Option<u16>, pulse: Option<u16>, glucose: Option<f64>) -> VitalRecord {
        VitalRecord {
            taken_at: NaiveDate::from_ymd_opt(2024, 1, d)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            systolic,
            diastolic: systolic.map(|s| s - 40),
            pulse,
            glucose,
        }
    }

    fn sample_store() -> RecordStore {
        RecordStore::from_records(vec![
            record(1, Some(120), Some(70), Some(5.5)),
            record(2, None, None, Some(6.1)),
            record(3, Some(130), None, None),
        ])
        .unwrap()
    }

    fn whole_window(store: &RecordStore) -> Window {
        select_timeframe(store, TimeframeMode::All)
    }

    #[test]
    fn test_presets_keep_the_expected_columns() {
        assert_eq!(
            ColumnPreset::BloodPressure.column_set().columns(),
            &[Column::Systolic, Column::Diastolic]
        );
        assert_eq!(ColumnPreset::Glucose.column_set().columns(), &[Column::Glucose]);
        assert_eq!(
            ColumnPreset::BloodPressurePulse.column_set().columns(),
            &[Column::Systolic, Column::Diastolic, Column::Pulse]
        );
        assert_eq!(ColumnPreset::All.column_set().columns().len(), 4);
    }

    #[test]
    fn test_rows_empty_across_kept_columns_are_dropped() {
        let store = sample_store();
        let window = whole_window(&store);

        // Day 2 has glucose only; filtering to blood pressure drops it.
        let rows = filter_rows(&store, &window, &ColumnPreset::BloodPressure.column_set());
        let positions: Vec<_> = rows.iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![0, 2]);

        // Filtering to glucose keeps days 1 and 2 but not 3.
        let rows = filter_rows(&store, &window, &ColumnPreset::Glucose.column_set());
        let positions: Vec<_> = rows.iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![0, 1]);
    }

    #[test]
    fn test_projection_blanks_dropped_columns() {
        let store = sample_store();
        let window = whole_window(&store);

        let rows = filter_rows(&store, &window, &ColumnPreset::Pulse.column_set());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].record.pulse, Some(70));
        assert_eq!(rows[0].record.systolic, None);
        assert_eq!(rows[0].record.glucose, None);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let store = sample_store();
        let window = whole_window(&store);
        let columns = ColumnPreset::BloodPressurePulse.column_set();

        let once = filter_rows(&store, &window, &columns);

        // Re-filter the projected rows through a store built from them.
        let again_store =
            RecordStore::from_records(once.iter().map(|r| r.record.clone()).collect()).unwrap();
        let again_window = whole_window(&again_store);
        let twice = filter_rows(&again_store, &again_window, &columns);

        let once_records: Vec<_> = once.iter().map(|r| r.record.clone()).collect();
        let twice_records: Vec<_> = twice.iter().map(|r| r.record.clone()).collect();
        assert_eq!(once_records, twice_records);
    }

    #[test]
    fn test_filter_never_mutates_the_store() {
        let store = sample_store();
        let before = store.clone();
        let window = whole_window(&store);

        let _ = filter_rows(&store, &window, &ColumnPreset::Glucose.column_set());

        assert_eq!(store, before);
    }

    #[test]
    fn test_display_renders_missing_values_as_dash() {
        let store = sample_store();
        let record = store.get(1).unwrap();

        assert_eq!(Column::Glucose.display(record), "6.1");
        assert_eq!(Column::Systolic.display(record), "-");
    }
}
