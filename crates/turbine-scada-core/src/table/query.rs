//! Series selection for the line chart.
//!
//! `series` is the production path: the table is sorted, so the range filter
//! becomes two `partition_point` searches and the result is a slice of the
//! selected column. `series_linear_scan` evaluates the same predicate row by
//! row with Arrow comparison kernels; it is kept as the reference the clip is
//! checked against.
use arrow::array::{AsArray, BooleanArray, Scalar, TimestampMillisecondArray};
use arrow::compute::filter;
use arrow::compute::kernels::{boolean as boolean_kernels, cmp as cmp_kernels};
use arrow::datatypes::{Float64Type, TimestampMillisecondType};
use log::debug;
use snafu::prelude::*;

use crate::range::RangeFilter;
use crate::series::{Series, SeriesPoint};
use crate::table::TimeSeriesTable;
use crate::table::error::{FilterSnafu, FilteredTypeSnafu, QueryError};
use crate::timestamp::{from_millis, to_millis};

fn millis_scalar(ms: i64) -> Scalar<TimestampMillisecondArray> {
    Scalar::new(TimestampMillisecondArray::from(vec![ms]))
}

impl TimeSeriesTable {
    /// Points of `column` whose timestamps satisfy `range`, ascending.
    ///
    /// An unknown column (including the empty "nothing selected" value)
    /// yields an empty series rather than an error.
    pub fn series(&self, column: &str, range: &RangeFilter) -> Series {
        let Some(values) = self.values(column) else {
            debug!("Series requested for unknown column '{column}'");
            return Series::empty(column);
        };

        let span = range.clip(self.timestamps_millis());
        let ts = &self.timestamps_millis()[span.clone()];
        let values = values.slice(span.start, span.len());

        let points = ts
            .iter()
            .zip(values.iter())
            .filter_map(|(&ms, value)| from_millis(ms).map(|ts| SeriesPoint { ts, value }))
            .collect();

        Series::new(column, points)
    }

    /// Reference implementation of [`TimeSeriesTable::series`] that masks
    /// every row with Arrow comparison kernels instead of clipping.
    pub fn series_linear_scan(
        &self,
        column: &str,
        range: &RangeFilter,
    ) -> Result<Series, QueryError> {
        let Some(values) = self.values(column) else {
            return Ok(Series::empty(column));
        };
        let ts = self.timestamps();

        let mask = match range.effective_bounds() {
            (Some(start), end) => {
                let after_start = cmp_kernels::gt(ts, &millis_scalar(to_millis(start)))
                    .context(FilterSnafu)?;
                match end {
                    Some(end) => {
                        let until_end = cmp_kernels::lt_eq(ts, &millis_scalar(to_millis(end)))
                            .context(FilterSnafu)?;
                        boolean_kernels::and(&after_start, &until_end).context(FilterSnafu)?
                    }
                    None => after_start,
                }
            }
            _ => BooleanArray::from(vec![true; ts.len()]),
        };

        let kept_ts = filter(ts, &mask).context(FilterSnafu)?;
        let kept_values = filter(values, &mask).context(FilterSnafu)?;

        let kept_ts = kept_ts
            .as_primitive_opt::<TimestampMillisecondType>()
            .context(FilteredTypeSnafu {
                column: self.time_column(),
            })?;
        let kept_values = kept_values
            .as_primitive_opt::<Float64Type>()
            .context(FilteredTypeSnafu { column })?;

        let points = kept_ts
            .values()
            .iter()
            .zip(kept_values.iter())
            .filter_map(|(&ms, value)| from_millis(ms).map(|ts| SeriesPoint { ts, value }))
            .collect();

        Ok(Series::new(column, points))
    }
}
