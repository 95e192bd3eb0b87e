//! Exact-timestamp gauge lookup behind chart clicks.
//!
//! A click on the chart reports the x value of the clicked sample. The lookup
//! matches that timestamp exactly; there is no nearest-neighbour fallback, so
//! a timestamp between two samples reads as [`PointReading::ZERO`].
use chrono::NaiveDateTime;
use log::debug;

use crate::config::GaugeColumns;
use crate::table::TimeSeriesTable;

/// Display metadata for one gauge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeSpec {
    /// Gauge label.
    pub label: &'static str,
    /// Unit suffix.
    pub units: &'static str,
    /// Lower end of the dial.
    pub min: f64,
    /// Upper end of the dial (theoretical maximum).
    pub max: f64,
}

impl GaugeSpec {
    /// Active power dial.
    pub const ACTIVE_POWER: GaugeSpec = GaugeSpec {
        label: "Active Power",
        units: "MW",
        min: 0.0,
        max: 20_000.0,
    };

    /// Power available from wind; shares the active power dial.
    pub const AVAILABLE_WIND_POWER: GaugeSpec = GaugeSpec {
        label: "Available Power from Wind",
        units: "MW",
        min: 0.0,
        max: 20_000.0,
    };

    /// Reactive power dial.
    pub const REACTIVE_POWER: GaugeSpec = GaugeSpec {
        label: "Reactive Power",
        units: "MVAR",
        min: 0.0,
        max: 10_000.0,
    };

    /// Wind speed dial.
    pub const WIND_SPEED: GaugeSpec = GaugeSpec {
        label: "Wind Speed",
        units: "m/s",
        min: 0.0,
        max: 50.0,
    };

    /// Clamp `value` onto the dial. Display only; readings are never altered.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// The four gauge values for one timestamp, in fixed order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointReading {
    /// Active power.
    pub active_power: f64,
    /// Active power available from wind.
    pub available_wind_power: f64,
    /// Reactive power.
    pub reactive_power: f64,
    /// Wind speed.
    pub wind_speed: f64,
}

impl PointReading {
    /// Reading reported when no row matches the clicked timestamp.
    pub const ZERO: PointReading = PointReading {
        active_power: 0.0,
        available_wind_power: 0.0,
        reactive_power: 0.0,
        wind_speed: 0.0,
    };

    /// Values as a tuple-like array in the fixed gauge order.
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.active_power,
            self.available_wind_power,
            self.reactive_power,
            self.wind_speed,
        ]
    }

    /// Values paired with their gauge metadata, in the fixed gauge order.
    pub fn gauges(&self) -> [(GaugeSpec, f64); 4] {
        [
            (GaugeSpec::ACTIVE_POWER, self.active_power),
            (GaugeSpec::AVAILABLE_WIND_POWER, self.available_wind_power),
            (GaugeSpec::REACTIVE_POWER, self.reactive_power),
            (GaugeSpec::WIND_SPEED, self.wind_speed),
        ]
    }
}

impl TimeSeriesTable {
    /// Gauge values of the row stamped exactly `ts`.
    ///
    /// Returns [`PointReading::ZERO`] when no row matches. Within a matched
    /// row, a missing gauge column or an empty cell reads as `0.0`. With
    /// duplicate timestamps the first row in load order wins.
    pub fn point_reading(&self, ts: NaiveDateTime, gauges: &GaugeColumns) -> PointReading {
        let Some(row) = self.row_at(ts) else {
            debug!("No row at {ts}; gauges fall back to zero");
            return PointReading::ZERO;
        };

        let read = |column: &str| self.value_at(column, row).unwrap_or(0.0);

        PointReading {
            active_power: read(&gauges.active_power),
            available_wind_power: read(&gauges.available_wind_power),
            reactive_power: read(&gauges.reactive_power),
            wind_speed: read(&gauges.wind_speed),
        }
    }
}
