use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use vitals_core::*;

#[derive(Parser)]
#[command(name = "myvitals")]
#[command(about = "Personal vital-sign record keeper", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// View records, narrowed to a date window and a column subset
    View {
        /// Target date (YYYY-MM-DD); omit to view every record
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Start from the latest record instead of a searched date
        #[arg(long, conflicts_with = "date")]
        latest: bool,

        /// Expand the selection to all records from the same day
        #[arg(long)]
        same_day: bool,

        /// Expand the selection to all records from the same month
        #[arg(long, conflicts_with = "same_day")]
        same_month: bool,

        /// Show the N records up to and including the selected one
        #[arg(long, value_name = "N", conflicts_with_all = ["same_day", "same_month"])]
        before: Option<usize>,

        /// Columns to show: all, glucose, bp, pulse, bp-pulse
        #[arg(long, default_value = "all")]
        columns: String,
    },

    /// Add a record
    Add {
        /// Date of the reading (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Time of the reading (HH:MM); midnight when omitted
        #[arg(long, value_parser = parse_time)]
        time: Option<NaiveTime>,

        /// Systolic blood pressure, mmHg
        #[arg(long)]
        systolic: Option<u16>,

        /// Diastolic blood pressure, mmHg
        #[arg(long)]
        diastolic: Option<u16>,

        /// Pulse rate, bpm
        #[arg(long)]
        pulse: Option<u16>,

        /// Blood glucose, mmol/L
        #[arg(long)]
        glucose: Option<f64>,
    },

    /// Edit a record located by date (and time or position)
    Edit {
        /// Date of the record to edit (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Exact time of the record to edit (HH:MM)
        #[arg(long, value_parser = parse_time)]
        time: Option<NaiveTime>,

        /// Position of the record to edit, from the listing shown
        /// when neither --time nor --position is given
        #[arg(long, conflicts_with = "time")]
        position: Option<usize>,

        /// Move the record to a new date
        #[arg(long)]
        set_date: Option<NaiveDate>,

        /// Move the record to a new time
        #[arg(long, value_parser = parse_time)]
        set_time: Option<NaiveTime>,

        /// New systolic blood pressure, mmHg
        #[arg(long, conflicts_with = "clear_systolic")]
        systolic: Option<u16>,

        /// New diastolic blood pressure, mmHg
        #[arg(long, conflicts_with = "clear_diastolic")]
        diastolic: Option<u16>,

        /// New pulse rate, bpm
        #[arg(long, conflicts_with = "clear_pulse")]
        pulse: Option<u16>,

        /// New blood glucose, mmol/L
        #[arg(long, conflicts_with = "clear_glucose")]
        glucose: Option<f64>,

        /// Clear the systolic value
        #[arg(long)]
        clear_systolic: bool,

        /// Clear the diastolic value
        #[arg(long)]
        clear_diastolic: bool,

        /// Clear the pulse value
        #[arg(long)]
        clear_pulse: bool,

        /// Clear the glucose value
        #[arg(long)]
        clear_glucose: bool,
    },

    /// Remove a record located by date (and time or position)
    Remove {
        /// Date of the record to remove (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Exact time of the record to remove (HH:MM)
        #[arg(long, value_parser = parse_time)]
        time: Option<NaiveTime>,

        /// Position of the record to remove, from the listing shown
        /// when neither --time nor --position is given
        #[arg(long, conflicts_with = "time")]
        position: Option<usize>,

        /// Confirm the removal; without it the record is only reported
        #[arg(long)]
        yes: bool,
    },

    /// Restore the data file from the backup written by the last save
    Revert,
}

fn main() {
    vitals_core::logging::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => {}
        Err(Error::NoSelection) => println!("No selection made."),
        Err(error) => {
            eprintln!("Error: {error}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let path = data_dir.join(VITALS_FILENAME);
    tracing::debug!("Using data file {}", path.display());

    match cli.command {
        Commands::View {
            date,
            latest,
            same_day,
            same_month,
            before,
            columns,
        } => cmd_view(&path, date, latest, same_day, same_month, before, &columns),

        Commands::Add {
            date,
            time,
            systolic,
            diastolic,
            pulse,
            glucose,
        } => {
            let record = VitalRecord {
                taken_at: NaiveDateTime::new(date, time.unwrap_or(NaiveTime::MIN)),
                systolic,
                diastolic,
                pulse,
                glucose,
            };
            cmd_add(&path, config.limits.clone(), record)
        }

        Commands::Edit {
            date,
            time,
            position,
            set_date,
            set_time,
            systolic,
            diastolic,
            pulse,
            glucose,
            clear_systolic,
            clear_diastolic,
            clear_pulse,
            clear_glucose,
        } => {
            let changes = RecordChanges {
                date: set_date,
                time: set_time,
                systolic: merge_update(systolic, clear_systolic),
                diastolic: merge_update(diastolic, clear_diastolic),
                pulse: merge_update(pulse, clear_pulse),
                glucose: merge_update(glucose, clear_glucose),
            };
            cmd_edit(&path, config.limits.clone(), date, time, position, changes)
        }

        Commands::Remove {
            date,
            time,
            position,
            yes,
        } => cmd_remove(&path, config.limits.clone(), date, time, position, yes),

        Commands::Revert => cmd_revert(&path),
    }
}

fn cmd_view(
    path: &Path,
    date: Option<NaiveDate>,
    latest: bool,
    same_day: bool,
    same_month: bool,
    before: Option<usize>,
    columns: &str,
) -> Result<()> {
    let preset = parse_preset(columns)
        .ok_or_else(|| Error::Config(format!("unknown column preset: {columns}")))?;

    let store = RecordStore::from_records(load_records(path)?)?;

    let start = if let Some(date) = date {
        Some(find_record(&store, midnight(date), DateMatch::DateOnly)?)
    } else if latest {
        Some(store.last_position().ok_or(Error::NotFound)?)
    } else {
        if same_day || same_month || before.is_some() {
            return Err(Error::Config(
                "a window flag needs --date or --latest".into(),
            ));
        }
        None
    };

    let mode = match start {
        None => TimeframeMode::All,
        Some(position) => {
            if same_day {
                TimeframeMode::SameDay(position)
            } else if same_month {
                TimeframeMode::SameMonth(position)
            } else if let Some(count) = before {
                TimeframeMode::Before {
                    end: position,
                    count,
                }
            } else {
                TimeframeMode::Single(position)
            }
        }
    };

    let window = select_timeframe(&store, mode);
    if let Some(notice) = &window.clamp_notice {
        println!("{notice}");
    }

    let rows = filter_rows(&store, &window, &preset.column_set());
    if rows.is_empty() {
        println!("There are no records available for viewing.");
        return Ok(());
    }

    println!("{} record(s) will be shown.", rows.len());
    print_table(&rows, &preset.column_set());
    Ok(())
}

fn cmd_add(path: &Path, limits: LimitsConfig, record: VitalRecord) -> Result<()> {
    let mut session = VitalsSession::new(load_records(path)?, limits)?;
    let message = session.add(record)?;
    save_records(path, session.store())?;
    println!("{message}");
    Ok(())
}

fn cmd_edit(
    path: &Path,
    limits: LimitsConfig,
    date: NaiveDate,
    time: Option<NaiveTime>,
    position: Option<usize>,
    changes: RecordChanges,
) -> Result<()> {
    let mut session = VitalsSession::new(load_records(path)?, limits)?;
    let target = resolve_position(session.store(), date, time, position, "edit")?;

    if changes.is_noop() {
        println!("No changes requested.");
        return Ok(());
    }

    let message = session.edit(target, changes)?;
    save_records(path, session.store())?;
    println!("{message}");
    Ok(())
}

fn cmd_remove(
    path: &Path,
    limits: LimitsConfig,
    date: NaiveDate,
    time: Option<NaiveTime>,
    position: Option<usize>,
    yes: bool,
) -> Result<()> {
    let mut session = VitalsSession::new(load_records(path)?, limits)?;
    let target = resolve_position(session.store(), date, time, position, "remove")?;

    match session.remove(target, yes)? {
        RemoveOutcome::Removed(message) => {
            save_records(path, session.store())?;
            println!("{message}");
        }
        RemoveOutcome::Declined(message) => {
            println!("{message}");
            println!("Pass --yes to confirm the removal.");
        }
    }
    Ok(())
}

fn cmd_revert(path: &Path) -> Result<()> {
    revert_from_backup(path)?;
    println!("The data file has been restored from the last backup.");
    Ok(())
}

/// Locate the record to mutate: an exact time is looked up directly;
/// otherwise the date's same-day run is crawled and the caller picks a
/// position from it. With no pick, the candidates are listed and the
/// selection is aborted.
fn resolve_position(
    store: &RecordStore,
    date: NaiveDate,
    time: Option<NaiveTime>,
    position: Option<usize>,
    action: &str,
) -> Result<usize> {
    if let Some(time) = time {
        return find_record(store, NaiveDateTime::new(date, time), DateMatch::Exact);
    }

    let hit = find_record(store, midnight(date), DateMatch::DateOnly)?;
    let window = select_timeframe(store, TimeframeMode::SameDay(hit));

    if let Some(picked) = position {
        if window.positions.contains(&picked) {
            return Ok(picked);
        }
        return Err(Error::NotFound);
    }

    println!("These are the records for {date}:");
    let rows = filter_rows(store, &window, &ColumnPreset::All.column_set());
    print_table(&rows, &ColumnPreset::All.column_set());
    println!("Re-run with --time HH:MM or --position N to pick the record to {action}.");
    Err(Error::NoSelection)
}

fn print_table(rows: &[FilteredRow], columns: &ColumnSet) {
    print!("{:>4}  {:<16}", "#", "taken_at");
    for column in columns.columns() {
        print!("  {:>9}", column.name());
    }
    println!();

    for row in rows {
        let taken_at = row.record.taken_at.format("%Y-%m-%d %H:%M").to_string();
        print!("{:>4}  {:<16}", row.position, taken_at);
        for column in columns.columns() {
            print!("  {:>9}", column.display(&row.record));
        }
        println!();
    }
}

fn parse_preset(name: &str) -> Option<ColumnPreset> {
    match name.to_lowercase().as_str() {
        "all" => Some(ColumnPreset::All),
        "glucose" => Some(ColumnPreset::Glucose),
        "bp" => Some(ColumnPreset::BloodPressure),
        "pulse" => Some(ColumnPreset::Pulse),
        "bp-pulse" => Some(ColumnPreset::BloodPressurePulse),
        _ => None,
    }
}

fn parse_time(s: &str) -> std::result::Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|e| format!("invalid time {s:?}: {e}"))
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    NaiveDateTime::new(date, NaiveTime::MIN)
}

fn merge_update<T>(set: Option<T>, clear: bool) -> Option<Option<T>> {
    if clear {
        Some(None)
    } else {
        set.map(Some)
    }
}
