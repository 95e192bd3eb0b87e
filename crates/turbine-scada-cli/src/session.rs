//! Dashboard state for one operator: the loaded table plus the current
//! column selection and date range.
//!
//! The table is shared (`Arc`) and never mutated; only the selection changes
//! between interactions, the way the dashboard's widgets held it client-side.

use std::{path::Path, sync::Arc};

use chrono::NaiveDateTime;
use log::debug;
use snafu::ResultExt;
use turbine_scada_core::{
    DashboardConfig, GaugeColumns, PointReading, RangeFilter, Series, TimeSeriesTable,
    readout::{column_readout, range_readout},
};

use crate::error::{CliResult, LoadConfigSnafu, LoadTableSnafu};

/// Resolve the effective config: file (if any), then `--time-column`.
pub fn resolve_config(
    config: Option<&Path>,
    time_column: Option<&str>,
) -> CliResult<DashboardConfig> {
    let mut cfg = match config {
        Some(path) => DashboardConfig::from_json_file(path).context(LoadConfigSnafu {
            path: path.display().to_string(),
        })?,
        None => DashboardConfig::default(),
    };

    if let Some(col) = time_column {
        cfg.time_column = col.to_string();
    }
    Ok(cfg)
}

/// Load the table once for the lifetime of the process.
pub fn load_table(csv: &Path, cfg: &DashboardConfig) -> CliResult<Arc<TimeSeriesTable>> {
    let (table, report) =
        TimeSeriesTable::load_csv(csv, &cfg.load_options()).context(LoadTableSnafu {
            csv: csv.display().to_string(),
        })?;
    debug!(
        "Table ready: {} rows ({} dropped)",
        report.rows_loaded, report.rows_dropped
    );
    Ok(Arc::new(table))
}

pub struct DashboardSession {
    table: Arc<TimeSeriesTable>,
    gauges: GaugeColumns,
    selected: String,
    range: RangeFilter,
}

impl DashboardSession {
    pub fn new(table: Arc<TimeSeriesTable>, gauges: GaugeColumns) -> Self {
        Self {
            table,
            gauges,
            selected: String::new(),
            range: RangeFilter::ALL,
        }
    }

    pub fn table(&self) -> &TimeSeriesTable {
        &self.table
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// Change the selected column; returns the column readout.
    pub fn select_column(&mut self, column: &str) -> String {
        self.selected = column.to_string();
        self.column_readout()
    }

    /// Change the date range; returns the range readout.
    pub fn set_range(&mut self, range: RangeFilter) -> String {
        self.range = range;
        self.range_readout()
    }

    pub fn column_readout(&self) -> String {
        column_readout(&self.table, &self.selected)
    }

    pub fn range_readout(&self) -> String {
        range_readout(&self.range)
    }

    /// Current chart series.
    pub fn series(&self) -> Series {
        self.table.series(&self.selected, &self.range)
    }

    /// Gauge values for a clicked chart point.
    pub fn click(&self, ts: NaiveDateTime) -> PointReading {
        self.table.point_reading(ts, &self.gauges)
    }
}
