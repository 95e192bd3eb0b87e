//! Dashboard configuration.
//!
//! A small JSON document selects the time column and the four gauge columns.
//! Every field is optional; missing fields fall back to the names used by
//! the SCADA export:
//!
//! ```json
//! {
//!   "time_column": "Time",
//!   "batch_size": 8192,
//!   "gauges": {
//!     "active_power": "WEC: ava. Power",
//!     "available_wind_power": "WEC: ava. available P from wind",
//!     "reactive_power": "WEC: ava. reactive Power",
//!     "wind_speed": "WEC: ava. windspeed"
//!   }
//! }
//! ```
use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::table::{DEFAULT_BATCH_SIZE, DEFAULT_TIME_COLUMN, LoadOptions};

/// Errors from reading a dashboard configuration file.
#[derive(Debug, Snafu)]
pub enum ConfigError {
    /// The config file could not be read.
    #[snafu(display("Failed to read config file {path}: {source}"))]
    ReadConfig {
        /// Path of the config file.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The config document is not valid JSON for [`DashboardConfig`].
    #[snafu(display("Invalid dashboard config: {source}"))]
    ParseConfig {
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

/// Column names feeding the four gauges.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GaugeColumns {
    /// Active power column.
    pub active_power: String,
    /// Active power available from wind.
    pub available_wind_power: String,
    /// Reactive power column.
    pub reactive_power: String,
    /// Wind speed column.
    pub wind_speed: String,
}

impl Default for GaugeColumns {
    fn default() -> Self {
        Self {
            active_power: "WEC: ava. Power".to_string(),
            available_wind_power: "WEC: ava. available P from wind".to_string(),
            reactive_power: "WEC: ava. reactive Power".to_string(),
            wind_speed: "WEC: ava. windspeed".to_string(),
        }
    }
}

/// Top-level dashboard configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Header name of the day-first time column.
    pub time_column: String,
    /// Rows per decoded CSV batch.
    pub batch_size: usize,
    /// Gauge column names.
    pub gauges: GaugeColumns,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            time_column: DEFAULT_TIME_COLUMN.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            gauges: GaugeColumns::default(),
        }
    }
}

impl DashboardConfig {
    /// Parse a config from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).context(ParseConfigSnafu)
    }

    /// Read and parse a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).context(ReadConfigSnafu {
            path: path.display().to_string(),
        })?;
        Self::from_json_str(&contents)
    }

    /// Loader options derived from this config.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            time_column: self.time_column.clone(),
            batch_size: self.batch_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() -> Result<(), ConfigError> {
        let cfg = DashboardConfig::from_json_str("{}")?;
        assert_eq!(cfg, DashboardConfig::default());
        assert_eq!(cfg.load_options(), LoadOptions::default());
        Ok(())
    }

    #[test]
    fn partial_gauges_keep_other_defaults() -> Result<(), ConfigError> {
        let cfg = DashboardConfig::from_json_str(
            r#"{"time_column": "ts", "gauges": {"wind_speed": "wind"}}"#,
        )?;
        assert_eq!(cfg.time_column, "ts");
        assert_eq!(cfg.gauges.wind_speed, "wind");
        assert_eq!(cfg.gauges.active_power, "WEC: ava. Power");
        assert_eq!(cfg.batch_size, DEFAULT_BATCH_SIZE);
        Ok(())
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = DashboardConfig::from_json_str("{ time_column: ").unwrap_err();
        assert!(matches!(err, ConfigError::ParseConfig { .. }));
    }

    #[test]
    fn reads_config_file_from_disk() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::TempDir::new()?;
        let path = tmp.path().join("dashboard.json");
        std::fs::write(&path, r#"{"batch_size": 16}"#)?;

        let cfg = DashboardConfig::from_json_file(&path)?;
        assert_eq!(cfg.batch_size, 16);

        let err = DashboardConfig::from_json_file(tmp.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadConfig { .. }));
        Ok(())
    }
}
