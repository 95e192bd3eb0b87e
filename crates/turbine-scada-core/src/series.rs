//! Plottable series returned by series queries.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, RecordBatch, TimestampMillisecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::error::ArrowError;
use chrono::NaiveDateTime;

use crate::timestamp::to_millis;

/// One chart point: a timestamp and the selected column's reading.
///
/// `value` is `None` where the CSV cell was empty; charts render that as a gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    /// Row timestamp (naive wall-clock time).
    pub ts: NaiveDateTime,
    /// Reading of the selected column at `ts`.
    pub value: Option<f64>,
}

/// Ordered (ascending by timestamp) points for one column.
///
/// An empty series is a valid result: it is what an unknown or not yet
/// selected column produces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    column: String,
    points: Vec<SeriesPoint>,
}

impl Series {
    /// Build a series from already ordered points.
    pub fn new(column: impl Into<String>, points: Vec<SeriesPoint>) -> Self {
        Self {
            column: column.into(),
            points,
        }
    }

    /// An empty series for `column`.
    pub fn empty(column: impl Into<String>) -> Self {
        Self::new(column, Vec::new())
    }

    /// Requested column name (kept even when the column does not exist).
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Points in ascending timestamp order.
    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    /// Consume the series, returning its points.
    pub fn into_points(self) -> Vec<SeriesPoint> {
        self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the series has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// X values (timestamps).
    pub fn xs(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        self.points.iter().map(|p| p.ts)
    }

    /// Y values (readings).
    pub fn ys(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.points.iter().map(|p| p.value)
    }

    /// Two-column Arrow batch (`time_column`, value column) for writers.
    pub fn to_record_batch(&self, time_column: &str) -> Result<RecordBatch, ArrowError> {
        let schema = Schema::new(vec![
            Field::new(
                time_column,
                DataType::Timestamp(TimeUnit::Millisecond, None),
                false,
            ),
            Field::new(self.column.as_str(), DataType::Float64, true),
        ]);

        let ts: TimestampMillisecondArray = self.xs().map(to_millis).map(Some).collect();
        let values: Float64Array = self.ys().collect();

        RecordBatch::try_new(
            Arc::new(schema),
            vec![Arc::new(ts) as ArrayRef, Arc::new(values) as ArrayRef],
        )
    }
}
