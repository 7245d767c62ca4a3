//! Error types for the vitals_core library.

use chrono::NaiveDateTime;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for vitals_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No record matches the search or crawl target
    #[error("record not found")]
    NotFound,

    /// Adding or editing would create a second record at an existing timestamp
    #[error("a record for {0} already exists")]
    Duplicate(NaiveDateTime),

    /// The record would be left with no measurement values at all
    #[error("a valid record must contain at least one measurement")]
    EmptyRecord,

    /// A measurement value falls outside the configured plausible range
    #[error("{field} value {value} is outside the plausible range")]
    OutOfRange { field: &'static str, value: String },

    /// The caller backed out of a selection step; an abort, not a failure
    #[error("no selection made")]
    NoSelection,

    /// Binary search failed to converge within its probe budget.
    /// Should only occur if the store's sort invariant has been violated.
    #[error("search did not converge; the record ordering may be corrupt")]
    SearchLimit,

    /// Loaded or stored data violates a store invariant
    #[error("data integrity error: {0}")]
    Integrity(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("configuration error: {0}")]
    Config(String),
}
