#![forbid(unsafe_code)]

//! Core domain model and record engine for the myVitals system.
//!
//! This crate provides:
//! - Domain types (records, edits, granularities)
//! - The timestamp-sorted record store and binary date search
//! - Range crawling, timeframe selection, and column filtering
//! - Transactional add/edit/remove with session-level undo
//! - CSV persistence and configuration

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod store;
pub mod search;
pub mod crawl;
pub mod timeframe;
pub mod filter;
pub mod engine;
pub mod csv_store;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::{Config, LimitsConfig};
pub use store::RecordStore;
pub use search::find_record;
pub use crawl::crawl;
pub use timeframe::{select_timeframe, TimeframeMode, Window};
pub use filter::{filter_rows, Column, ColumnPreset, ColumnSet, FilteredRow};
pub use engine::{RemoveOutcome, VitalsSession};
pub use csv_store::{load_records, revert_from_backup, save_records, VITALS_FILENAME};
