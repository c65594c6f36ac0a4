//! TOML-based estimation configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::grid::estimator::{LoadSheddingEstimator, MlrRule};
use crate::grid::pipeline::{DEFAULT_TIMESTAMP_COLUMN, Pipeline, ThresholdSource};
use crate::grid::threshold::ThresholdTable;

/// Top-level configuration parsed from TOML.
///
/// All fields have defaults matching the `recall` preset. Load from TOML
/// with [`Config::from_toml_file`] or use [`Config::recall`] for the
/// built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Hour-of-day threshold table.
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    /// Decision rule options.
    #[serde(default)]
    pub estimator: EstimatorConfig,
    /// Source table layout.
    #[serde(default)]
    pub input: InputConfig,
}

/// Hour-of-day threshold table. Hours are inclusive and in `0..=23`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdConfig {
    pub peak_hour: u8,
    pub peak: i32,
    pub trough_hour: u8,
    pub trough: i32,
    pub evening_start: u8,
    pub evening_end: u8,
    pub evening: i32,
    pub night_start: u8,
    pub night_end: u8,
    pub night: i32,
    /// Threshold for every hour not matched above.
    pub default: i32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self::from(ThresholdTable::default())
    }
}

impl From<ThresholdTable> for ThresholdConfig {
    fn from(t: ThresholdTable) -> Self {
        Self {
            peak_hour: t.peak_hour,
            peak: t.peak,
            trough_hour: t.trough_hour,
            trough: t.trough,
            evening_start: t.evening_hours.0,
            evening_end: t.evening_hours.1,
            evening: t.evening,
            night_start: t.night_hours.0,
            night_end: t.night_hours.1,
            night: t.night,
            default: t.default,
        }
    }
}

impl ThresholdConfig {
    pub fn table(&self) -> ThresholdTable {
        ThresholdTable {
            peak_hour: self.peak_hour,
            peak: self.peak,
            trough_hour: self.trough_hour,
            trough: self.trough,
            evening_hours: (self.evening_start, self.evening_end),
            evening: self.evening,
            night_hours: (self.night_start, self.night_end),
            night: self.night,
            default: self.default,
        }
    }
}

/// Decision rule options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimatorConfig {
    /// `"literal"` or `"positive_deficit"`.
    pub mlr_rule: MlrRule,
    /// `"hour"` (derive from timestamp) or `"column"` (read from the table).
    pub threshold_source: ThresholdSource,
}

/// Source table layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Header of the timestamp column.
    pub timestamp_column: String,
    /// `chrono` format string for the timestamp column.
    pub timestamp_format: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            timestamp_column: DEFAULT_TIMESTAMP_COLUMN.to_string(),
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"thresholds.peak_hour"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Flat threshold of the `accuracy` preset: higher accuracy, lower recall.
pub const ACCURACY_THRESHOLD: i32 = 2500;

impl Config {
    /// Tuned time-of-day table: lower accuracy, higher recall.
    pub fn recall() -> Self {
        Self::default()
    }

    /// One flat threshold for every hour.
    pub fn accuracy() -> Self {
        Self {
            thresholds: ThresholdTable::flat(ACCURACY_THRESHOLD).into(),
            ..Self::default()
        }
    }

    /// Tuned table with the MLR fallback limited to positive deficits.
    pub fn guarded() -> Self {
        Self {
            estimator: EstimatorConfig {
                mlr_rule: MlrRule::PositiveDeficit,
                ..EstimatorConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["recall", "accuracy", "guarded"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "recall" => Ok(Self::recall()),
            "accuracy" => Ok(Self::accuracy()),
            "guarded" => Ok(Self::guarded()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Builds the estimation pipeline described by this configuration.
    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(
            self.thresholds.table(),
            self.estimator.threshold_source,
            LoadSheddingEstimator::new(self.estimator.mlr_rule),
        )
        .with_timestamp_column(self.input.timestamp_column.as_str())
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let t = &self.thresholds;
        let last_hour = 23;

        for (field, hour) in [
            ("thresholds.peak_hour", t.peak_hour),
            ("thresholds.trough_hour", t.trough_hour),
            ("thresholds.evening_start", t.evening_start),
            ("thresholds.evening_end", t.evening_end),
            ("thresholds.night_start", t.night_start),
            ("thresholds.night_end", t.night_end),
        ] {
            if hour > last_hour {
                errors.push(ConfigError::new(field, format!("must be <= {last_hour}, got {hour}")));
            }
        }
        if t.evening_start > t.evening_end {
            errors.push(ConfigError::new(
                "thresholds.evening_start",
                "must be <= thresholds.evening_end",
            ));
        }
        if t.night_start > t.night_end {
            errors.push(ConfigError::new(
                "thresholds.night_start",
                "must be <= thresholds.night_end",
            ));
        }

        let input = &self.input;
        if input.timestamp_column.trim().is_empty() {
            errors.push(ConfigError::new("input.timestamp_column", "must not be empty"));
        }
        if input.timestamp_format.is_empty() {
            errors.push(ConfigError::new("input.timestamp_format", "must not be empty"));
        }

        errors
    }
}
