//! Configuration file support for myVitals.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/myvitals/config.toml`.

use crate::{Error, Result, VitalRecord};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Plausible-value ranges for measurements, all bounds exclusive.
///
/// These are passed into the mutation engine at construction so the core
/// can be exercised with alternate ranges.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_blood_pressure_mmhg")]
    pub blood_pressure_mmhg: (u16, u16),

    #[serde(default = "default_pulse_bpm")]
    pub pulse_bpm: (u16, u16),

    #[serde(default = "default_glucose_mmol_l")]
    pub glucose_mmol_l: (f64, f64),
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            blood_pressure_mmhg: default_blood_pressure_mmhg(),
            pulse_bpm: default_pulse_bpm(),
            glucose_mmol_l: default_glucose_mmol_l(),
        }
    }
}

impl LimitsConfig {
    /// Validate a record against the not-all-empty invariant and the
    /// configured plausible ranges.
    pub fn validate(&self, record: &VitalRecord) -> Result<()> {
        if record.is_empty() {
            return Err(Error::EmptyRecord);
        }

        check_within("systolic", record.systolic, self.blood_pressure_mmhg)?;
        check_within("diastolic", record.diastolic, self.blood_pressure_mmhg)?;
        check_within("pulse", record.pulse, self.pulse_bpm)?;

        if let Some(glucose) = record.glucose {
            let (low, high) = self.glucose_mmol_l;
            if glucose <= low || glucose >= high {
                return Err(Error::OutOfRange {
                    field: "glucose",
                    value: format!("{glucose:.1}"),
                });
            }
        }

        Ok(())
    }
}

fn check_within(field: &'static str, value: Option<u16>, (low, high): (u16, u16)) -> Result<()> {
    match value {
        Some(v) if v <= low || v >= high => Err(Error::OutOfRange {
            field,
            value: v.to_string(),
        }),
        _ => Ok(()),
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("myvitals")
}

fn default_blood_pressure_mmhg() -> (u16, u16) {
    (20, 300)
}

fn default_pulse_bpm() -> (u16, u16) {
    (10, 200)
}

fn default_glucose_mmol_l() -> (f64, f64) {
    (0.0, 30.0)
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("myvitals").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
