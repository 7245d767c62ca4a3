//! Flat-file persistence for vitals records.
//!
//! Records live in a single CSV file. Loading bootstraps the file with
//! its schema header when missing; saving writes the previous file aside
//! to a `.bak` first, so the last save can be rolled back. Reads take a
//! shared lock and writes an exclusive lock via `fs2`.

use crate::{Error, RecordStore, Result, VitalRecord};
use chrono::NaiveDateTime;
use csv::StringRecord;
use fs2::FileExt;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Default name of the records file inside the data directory.
pub const VITALS_FILENAME: &str = "myvitals.csv";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Schema header, built once; written on bootstrap and checked on load.
static CSV_HEADER: Lazy<StringRecord> = Lazy::new(|| {
    StringRecord::from(vec!["taken_at", "systolic", "diastolic", "pulse", "glucose"])
});

/// CSV row format; field names define the file's header.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    taken_at: String,
    systolic: Option<u16>,
    diastolic: Option<u16>,
    pulse: Option<u16>,
    glucose: Option<f64>,
}

impl TryFrom<CsvRow> for VitalRecord {
    type Error = Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let taken_at = NaiveDateTime::parse_from_str(&row.taken_at, "%Y-%m-%d %H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(&row.taken_at, TIMESTAMP_FORMAT))
            .map_err(|e| Error::Integrity(format!("bad timestamp {:?}: {}", row.taken_at, e)))?;

        Ok(VitalRecord {
            taken_at,
            systolic: row.systolic,
            diastolic: row.diastolic,
            pulse: row.pulse,
            glucose: row.glucose,
        })
    }
}

impl From<&VitalRecord> for CsvRow {
    fn from(record: &VitalRecord) -> Self {
        CsvRow {
            taken_at: record.taken_at.format(TIMESTAMP_FORMAT).to_string(),
            systolic: record.systolic,
            diastolic: record.diastolic,
            pulse: record.pulse,
            glucose: record.glucose,
        }
    }
}

/// Load all records from the CSV file.
///
/// A missing file is created with the schema header and loads as empty.
/// A present file must carry the expected header, and every row must
/// parse; readings are medical data, so malformed rows fail the load
/// rather than being skipped.
pub fn load_records(path: &Path) -> Result<Vec<VitalRecord>> {
    if !path.exists() {
        bootstrap(path)?;
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(&file);

    let headers = reader.headers()?;
    if headers != &*CSV_HEADER {
        return Err(Error::Integrity(format!(
            "unexpected header {:?} in {}",
            headers,
            path.display()
        )));
    }

    let mut records = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        records.push(VitalRecord::try_from(row)?);
    }

    drop(reader);
    file.unlock()?;

    tracing::info!("Loaded {} record(s) from {}", records.len(), path.display());
    Ok(records)
}

/// Write all records to the CSV file.
///
/// The rows are written to a temp file in the same directory, synced,
/// and renamed into place; the previous file is kept as `<name>.bak`
/// so [`revert_from_backup`] can roll the save back.
pub fn save_records(path: &Path, store: &RecordStore) -> Result<()> {
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::Other, "records path missing parent")
    })?;
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = csv::Writer::from_writer(BufWriter::new(temp.as_file()));
        for record in store.records() {
            writer.serialize(CsvRow::from(record))?;
        }
        // An empty store still gets its header row.
        if store.is_empty() {
            writer.write_record(CSV_HEADER.iter())?;
        }
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    // Keep the previous file as the rollback point for this save.
    if path.exists() {
        std::fs::rename(path, backup_path(path))?;
    }
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::info!("Saved {} record(s) to {}", store.len(), path.display());
    Ok(())
}

/// Swap the `.bak` written by the last save back into place.
pub fn revert_from_backup(path: &Path) -> Result<()> {
    let backup = backup_path(path);
    if !backup.exists() {
        return Err(Error::NotFound);
    }

    std::fs::rename(&backup, path)?;
    tracing::info!("Restored {} from its backup", path.display());
    Ok(())
}

fn bootstrap(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(CSV_HEADER.iter())?;
    writer.flush()?;

    tracing::info!("Created new records file at {}", path.display());
    Ok(())
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}
