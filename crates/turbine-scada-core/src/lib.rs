//! Core engine for the wind-turbine SCADA dashboard.
//!
//! This crate owns the one piece of real logic behind the dashboard views:
//!
//! - An immutable, timestamp-sorted [`TimeSeriesTable`] loaded once from a
//!   SCADA CSV export (`table` module). Rows whose day-first timestamp cannot
//!   be parsed are dropped at load time.
//! - A [`RangeFilter`] modelling the date-picker bounds (start exclusive, end
//!   inclusive) and the binary-search clip that applies it (`range` module).
//! - Series selection for the line chart (`TimeSeriesTable::series`) and the
//!   exact-timestamp gauge lookup behind chart clicks
//!   (`TimeSeriesTable::point_reading`).
//! - Status-box texts shown next to the chart (`readout` module) and the JSON
//!   dashboard configuration (`config` module).
//!
//! Front ends (the `scada` CLI, or any other shell) load the table once, wrap
//! it in an `Arc`, and call into these pure functions on every interaction.
#![deny(missing_docs)]

pub mod config;
pub mod range;
pub mod readout;
pub mod series;
pub mod table;
pub mod timestamp;

pub use config::{ConfigError, DashboardConfig, GaugeColumns};
pub use range::{ParseBoundError, RangeFilter};
pub use series::{Series, SeriesPoint};
pub use table::{
    LoadError, LoadOptions, LoadReport, QueryError, TimeSeriesTable,
    point::{GaugeSpec, PointReading},
};
