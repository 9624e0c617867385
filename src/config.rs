//! TOML-based run configuration.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::battery::{
    BATTERY_CAPACITY, Battery, EFFICIENCY_LOSS, INTERVAL_HOURS, STARTING_SOC, SocBounds,
};

/// Input file read when neither the config nor the command line names one.
pub const DEFAULT_INPUT_PATH: &str = "power_over_time.csv";

/// Top-level configuration parsed from TOML.
///
/// All fields have defaults matching the fixed constants of the recurrence.
/// Load from TOML with [`SocConfig::from_toml_file`] or use
/// [`SocConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SocConfig {
    /// Battery recurrence parameters.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Row source parameters.
    #[serde(default)]
    pub input: InputConfig,
}

/// Battery recurrence parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// SoC before the first reading (0.0–1.0).
    pub starting_soc: f64,
    /// Capacity in energy units (must be > 0).
    pub capacity: f64,
    /// Conversion efficiency (0.0 exclusive – 1.0 inclusive).
    pub efficiency_loss: f64,
    /// Hours covered by one reading (must be > 0).
    pub interval_hours: f64,
    /// `"unclamped"` or `"clamped"`.
    pub bounds: SocBounds,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            starting_soc: STARTING_SOC,
            capacity: BATTERY_CAPACITY,
            efficiency_loss: EFFICIENCY_LOSS,
            interval_hours: INTERVAL_HOURS,
            bounds: SocBounds::Unclamped,
        }
    }
}

impl BatteryConfig {
    /// Builds the transfer function described by this section.
    pub fn battery(&self) -> Battery {
        Battery::new(
            self.capacity,
            self.efficiency_loss,
            self.interval_hours,
            self.bounds,
        )
    }
}

/// Row source parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// CSV file with `Time` and `Power` columns.
    pub path: PathBuf,
    /// Reject malformed power fields instead of reading them as `NaN`.
    pub strict: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_INPUT_PATH),
            strict: false,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery.capacity"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl SocConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let b = &self.battery;

        if !(b.starting_soc.is_finite() && (0.0..=1.0).contains(&b.starting_soc)) {
            errors.push(ConfigError {
                field: "battery.starting_soc".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }
        if !(b.capacity.is_finite() && b.capacity > 0.0) {
            errors.push(ConfigError {
                field: "battery.capacity".into(),
                message: "must be finite and > 0".into(),
            });
        }
        if !(b.efficiency_loss > 0.0 && b.efficiency_loss <= 1.0) {
            errors.push(ConfigError {
                field: "battery.efficiency_loss".into(),
                message: "must be in (0.0, 1.0]".into(),
            });
        }
        if !(b.interval_hours.is_finite() && b.interval_hours > 0.0) {
            errors.push(ConfigError {
                field: "battery.interval_hours".into(),
                message: "must be finite and > 0".into(),
            });
        }

        if self.input.path.as_os_str().is_empty() {
            errors.push(ConfigError {
                field: "input.path".into(),
                message: "must not be empty".into(),
            });
        }

        errors
    }
}
