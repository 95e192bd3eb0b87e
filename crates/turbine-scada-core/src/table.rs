//! Table layer.
//!
//! [`TimeSeriesTable`] is the immutable in-memory view over one SCADA export:
//! a single Arrow `RecordBatch` whose first column is the time index
//! (`Timestamp(Millisecond, None)`, sorted ascending) followed by one
//! nullable `Float64` column per sensor. It is built once by the loader and
//! shared read-only (typically behind an `Arc`) by every query.
//!
//! Operations are split across submodules:
//! - `load`: CSV ingestion, day-first timestamp parsing, sorting.
//! - `query`: range-filtered series selection.
//! - `point`: exact-timestamp gauge lookup.

pub mod error;
mod load;
pub mod point;
mod query;

#[cfg(test)]
pub(crate) mod test_util;

use arrow::array::{Array, AsArray, Float64Array, RecordBatch, TimestampMillisecondArray};
use arrow::datatypes::{Float64Type, TimestampMillisecondType};
use chrono::NaiveDateTime;
use snafu::prelude::*;

use crate::timestamp::{from_millis, to_millis};

pub use error::{LoadError, QueryError};
pub use load::{DEFAULT_BATCH_SIZE, DEFAULT_TIME_COLUMN, LoadOptions, LoadReport};

use error::ColumnTypeSnafu;

/// Immutable, timestamp-sorted SCADA table.
#[derive(Debug, Clone)]
pub struct TimeSeriesTable {
    time_column: String,
    columns: Vec<String>,
    timestamps: TimestampMillisecondArray,
    values: Vec<Float64Array>,
    batch: RecordBatch,
}

impl TimeSeriesTable {
    /// Wrap a batch laid out as `[time, sensor...]` whose time column is
    /// already sorted ascending.
    pub(crate) fn from_sorted_batch(
        time_column: String,
        batch: RecordBatch,
    ) -> Result<Self, LoadError> {
        let schema = batch.schema();
        let fields = schema.fields();

        let timestamps = batch
            .columns()
            .first()
            .and_then(|c| c.as_primitive_opt::<TimestampMillisecondType>())
            .context(ColumnTypeSnafu {
                column: time_column.as_str(),
                expected: "Timestamp(Millisecond, None)",
            })?
            .clone();

        let mut columns = Vec::with_capacity(fields.len().saturating_sub(1));
        let mut values = Vec::with_capacity(fields.len().saturating_sub(1));
        for (field, array) in fields.iter().zip(batch.columns()).skip(1) {
            let array = array
                .as_primitive_opt::<Float64Type>()
                .context(ColumnTypeSnafu {
                    column: field.name().as_str(),
                    expected: "Float64",
                })?;
            columns.push(field.name().clone());
            values.push(array.clone());
        }

        debug_assert!(
            timestamps.values().windows(2).all(|w| w[0] <= w[1]),
            "time column must be sorted"
        );

        Ok(Self {
            time_column,
            columns,
            timestamps,
            values,
            batch,
        })
    }

    /// Name of the time index column.
    pub fn time_column(&self) -> &str {
        &self.time_column
    }

    /// Selectable sensor columns, in CSV header order (time column excluded).
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// True if `name` is a selectable sensor column.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.timestamps.len()
    }

    /// True if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// Sorted timestamps as milliseconds since the Unix epoch (naive time).
    pub fn timestamps_millis(&self) -> &[i64] {
        self.timestamps.values()
    }

    pub(crate) fn timestamps(&self) -> &TimestampMillisecondArray {
        &self.timestamps
    }

    /// Timestamp of row `row`.
    pub fn timestamp_at(&self, row: usize) -> Option<NaiveDateTime> {
        self.timestamps_millis()
            .get(row)
            .copied()
            .and_then(from_millis)
    }

    /// First and last timestamps (the date picker's min/max).
    pub fn time_bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.timestamp_at(0)?;
        let last = self.timestamp_at(self.num_rows().checked_sub(1)?)?;
        Some((first, last))
    }

    /// Index of the first row whose timestamp equals `ts` exactly.
    pub fn row_at(&self, ts: NaiveDateTime) -> Option<usize> {
        let target = to_millis(ts);
        let ts = self.timestamps_millis();
        let idx = ts.partition_point(|&t| t < target);
        (idx < ts.len() && ts[idx] == target).then_some(idx)
    }

    /// Readings of one sensor column.
    pub fn values(&self, column: &str) -> Option<&Float64Array> {
        self.column_index(column).map(|i| &self.values[i])
    }

    /// Reading of `column` at `row`; `None` for unknown columns, out-of-range
    /// rows and empty cells.
    pub fn value_at(&self, column: &str, row: usize) -> Option<f64> {
        let values = self.values(column)?;
        (row < values.len() && values.is_valid(row)).then(|| values.value(row))
    }

    /// Read-only access to the underlying Arrow batch.
    pub fn record_batch(&self) -> &RecordBatch {
        &self.batch
    }
}

#[cfg(test)]
mod tests {
    use super::test_util::*;
    use std::sync::Arc;

    #[test]
    fn accessors_describe_the_loaded_table() -> TestResult {
        let table = table_from_csv(SCENARIO_CSV)?;

        assert_eq!(table.time_column(), "Time");
        assert_eq!(table.columns(), ["power", "wind"]);
        assert!(table.has_column("power"));
        assert!(!table.has_column("Time"));
        assert!(!table.has_column("nonexistent"));
        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.time_bounds(), Some((ts(0, 0), ts(0, 20))));
        assert_eq!(table.record_batch().num_columns(), 3);
        Ok(())
    }

    #[test]
    fn row_at_requires_exact_match() -> TestResult {
        let table = table_from_csv(SCENARIO_CSV)?;

        assert_eq!(table.row_at(ts(0, 10)), Some(1));
        assert_eq!(table.row_at(ts(0, 5)), None);
        assert_eq!(table.row_at(ts(1, 0)), None);
        Ok(())
    }

    #[test]
    fn value_at_handles_missing_cells() -> TestResult {
        let table = table_from_csv("Time,power\n01/05/2014 00:00:00,\n01/05/2014 00:10:00,2.5\n")?;

        assert_eq!(table.value_at("power", 0), None);
        assert_eq!(table.value_at("power", 1), Some(2.5));
        assert_eq!(table.value_at("power", 2), None);
        assert_eq!(table.value_at("nonexistent", 1), None);
        Ok(())
    }

    #[test]
    fn empty_table_has_no_bounds() -> TestResult {
        let table = table_from_csv("Time,power\n")?;
        assert!(table.is_empty());
        assert_eq!(table.time_bounds(), None);
        assert_eq!(table.columns(), ["power"]);
        Ok(())
    }

    #[test]
    fn table_is_shareable_across_threads() -> TestResult {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<super::TimeSeriesTable>();

        let table = Arc::new(table_from_csv(SCENARIO_CSV)?);
        let expected = table.series("power", &range(Some(ts(0, 0)), None));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let table = Arc::clone(&table);
                std::thread::spawn(move || table.series("power", &range(Some(ts(0, 0)), None)))
            })
            .collect();

        for h in handles {
            let got = h.join().map_err(|_| "query thread panicked")?;
            assert_eq!(got, expected);
        }
        Ok(())
    }
}
