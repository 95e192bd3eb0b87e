//! CSV ingestion for `TimeSeriesTable`.
//!
//! The loader works in four steps:
//! 1. Read the header to locate the configured time column and build a read
//!    schema: the time column as `Utf8`, every other column as nullable
//!    `Float64` (empty cells become nulls, non-numeric cells are a decode
//!    error).
//! 2. Stream the body through `arrow_csv` in `batch_size` batches, parsing the
//!    time strings day-first into `Timestamp(Millisecond, None)` and dropping
//!    rows whose timestamp does not parse.
//! 3. Concatenate the batches and stable-sort them by time (skipped when the
//!    export is already sorted).
//! 4. Wrap the result as an immutable table and report what was dropped.
use std::{
    collections::HashSet,
    fs,
    io::{Cursor, Read},
    path::Path,
    sync::Arc,
};

use arrow::array::{Array, ArrayRef, AsArray, RecordBatch, TimestampMillisecondArray, UInt32Array};
use arrow::compute::kernels::boolean as boolean_kernels;
use arrow::compute::{concat_batches, filter_record_batch, take};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit, TimestampMillisecondType};
use arrow_csv::{ReaderBuilder, reader::Format};
use log::{debug, info, warn};
use snafu::prelude::*;

use crate::table::TimeSeriesTable;
use crate::table::error::{
    ArrowSnafu, ColumnTypeSnafu, CsvHeaderSnafu, CsvReadSnafu, DuplicateColumnSnafu, LoadError,
    MissingTimeColumnSnafu, ReadFileSnafu, ReadInputSnafu, TooManyRowsSnafu,
};
use crate::timestamp::{parse_day_first, to_millis};

/// Name of the time column in SCADA exports.
pub const DEFAULT_TIME_COLUMN: &str = "Time";

/// Rows per Arrow batch while decoding.
pub const DEFAULT_BATCH_SIZE: usize = 8192;

/// Options controlling how a CSV export is turned into a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Header name of the day-first time column.
    pub time_column: String,
    /// Rows per decoded batch.
    pub batch_size: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            time_column: DEFAULT_TIME_COLUMN.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Row accounting for one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Data rows decoded from the CSV body.
    pub rows_read: usize,
    /// Rows dropped because their timestamp did not parse.
    pub rows_dropped: usize,
    /// Rows kept in the table.
    pub rows_loaded: usize,
}

impl TimeSeriesTable {
    /// Load a table from a CSV file on disk.
    pub fn load_csv(
        path: impl AsRef<Path>,
        opts: &LoadOptions,
    ) -> Result<(Self, LoadReport), LoadError> {
        let path = path.as_ref();
        let bytes = fs::read(path).context(ReadFileSnafu {
            path: path.display().to_string(),
        })?;

        let (table, report) = Self::load_csv_bytes(&bytes, opts)?;
        info!(
            "Loaded {} rows x {} columns from {} ({} dropped, {} read)",
            report.rows_loaded,
            table.columns().len(),
            path.display(),
            report.rows_dropped,
            report.rows_read
        );
        Ok((table, report))
    }

    /// Load a table from any reader producing CSV text.
    pub fn load_csv_reader<R: Read>(
        mut reader: R,
        opts: &LoadOptions,
    ) -> Result<(Self, LoadReport), LoadError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).context(ReadInputSnafu)?;
        Self::load_csv_bytes(&bytes, opts)
    }

    fn load_csv_bytes(bytes: &[u8], opts: &LoadOptions) -> Result<(Self, LoadReport), LoadError> {
        let header = read_header(bytes)?;
        let time_idx = locate_time_column(&header, &opts.time_column)?;

        let (read_schema, table_schema) = build_schemas(&header, time_idx);

        let reader = ReaderBuilder::new(read_schema)
            .with_header(true)
            .with_batch_size(opts.batch_size.max(1))
            .build(Cursor::new(bytes))
            .context(CsvReadSnafu)?;

        let mut report = LoadReport::default();
        let mut batches = Vec::new();

        for batch in reader {
            let batch = batch.context(CsvReadSnafu)?;
            let converted = convert_batch(&batch, time_idx, &opts.time_column, &table_schema)?;

            report.rows_read += batch.num_rows();
            report.rows_dropped += batch.num_rows() - converted.num_rows();
            batches.push(converted);
        }

        if report.rows_dropped > 0 {
            warn!(
                "Dropped {} of {} rows with unparseable '{}' values",
                report.rows_dropped, report.rows_read, opts.time_column
            );
        }

        let combined = concat_batches(&table_schema, &batches).context(ArrowSnafu)?;
        let sorted = sort_by_time(combined, &opts.time_column)?;
        report.rows_loaded = sorted.num_rows();

        let table = TimeSeriesTable::from_sorted_batch(opts.time_column.clone(), sorted)?;
        Ok((table, report))
    }
}

fn read_header(bytes: &[u8]) -> Result<Vec<String>, LoadError> {
    // max_records = 0: only the header row is consumed.
    let (schema, _) = Format::default()
        .with_header(true)
        .infer_schema(Cursor::new(bytes), Some(0))
        .context(CsvHeaderSnafu)?;

    let names: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();

    let mut seen = HashSet::with_capacity(names.len());
    for name in &names {
        ensure!(
            seen.insert(name.as_str()),
            DuplicateColumnSnafu {
                column: name.as_str()
            }
        );
    }

    Ok(names)
}

fn locate_time_column(header: &[String], time_column: &str) -> Result<usize, LoadError> {
    header
        .iter()
        .position(|name| name == time_column)
        .context(MissingTimeColumnSnafu {
            column: time_column,
            available: header.join(", "),
        })
}

/// Returns `(read_schema, table_schema)`.
///
/// The read schema mirrors the header order; the table schema moves the time
/// column to the front as a millisecond timestamp.
fn build_schemas(header: &[String], time_idx: usize) -> (SchemaRef, SchemaRef) {
    let read_fields: Vec<Field> = header
        .iter()
        .enumerate()
        .map(|(i, name)| {
            if i == time_idx {
                Field::new(name.as_str(), DataType::Utf8, true)
            } else {
                Field::new(name.as_str(), DataType::Float64, true)
            }
        })
        .collect();

    let mut table_fields = Vec::with_capacity(header.len());
    table_fields.push(Field::new(
        header[time_idx].as_str(),
        DataType::Timestamp(TimeUnit::Millisecond, None),
        false,
    ));
    table_fields.extend(
        header
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != time_idx)
            .map(|(_, name)| Field::new(name.as_str(), DataType::Float64, true)),
    );

    (
        Arc::new(Schema::new(read_fields)),
        Arc::new(Schema::new(table_fields)),
    )
}

/// Parse the time strings of one decoded batch and drop rows that fail.
fn convert_batch(
    batch: &RecordBatch,
    time_idx: usize,
    time_column: &str,
    table_schema: &SchemaRef,
) -> Result<RecordBatch, LoadError> {
    let raw = batch
        .column(time_idx)
        .as_string_opt::<i32>()
        .context(ColumnTypeSnafu {
            column: time_column,
            expected: "Utf8",
        })?;

    let ts: TimestampMillisecondArray = raw
        .iter()
        .map(|cell| cell.and_then(parse_day_first).map(to_millis))
        .collect();

    let keep = boolean_kernels::is_not_null(&ts).context(ArrowSnafu)?;

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(batch.num_columns());
    columns.push(Arc::new(ts));
    columns.extend(
        batch
            .columns()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != time_idx)
            .map(|(_, col)| Arc::clone(col)),
    );

    // Nullable while unfiltered; `keep` removes every null timestamp below.
    let staged_schema = Arc::new(Schema::new(
        table_schema
            .fields()
            .iter()
            .map(|f| f.as_ref().clone().with_nullable(true))
            .collect::<Vec<_>>(),
    ));
    let staged = RecordBatch::try_new(staged_schema, columns).context(ArrowSnafu)?;
    let filtered = filter_record_batch(&staged, &keep).context(ArrowSnafu)?;

    RecordBatch::try_new(Arc::clone(table_schema), filtered.columns().to_vec()).context(ArrowSnafu)
}

/// Stable sort by the time column; a no-op for already sorted exports.
fn sort_by_time(batch: RecordBatch, time_column: &str) -> Result<RecordBatch, LoadError> {
    let ts = batch
        .column(0)
        .as_primitive_opt::<TimestampMillisecondType>()
        .context(ColumnTypeSnafu {
            column: time_column,
            expected: "Timestamp(Millisecond, None)",
        })?;
    let values: &[i64] = ts.values();

    if values.windows(2).all(|w| w[0] <= w[1]) {
        return Ok(batch);
    }

    let rows = values.len();
    let n = u32::try_from(rows).ok().context(TooManyRowsSnafu { rows })?;
    debug!("Sorting {rows} rows by '{time_column}'");

    let mut order: Vec<u32> = (0..n).collect();
    order.sort_by_key(|&i| values[i as usize]);
    let indices = UInt32Array::from(order);

    let columns = batch
        .columns()
        .iter()
        .map(|col| take(col.as_ref(), &indices, None))
        .collect::<Result<Vec<_>, _>>()
        .context(ArrowSnafu)?;

    RecordBatch::try_new(batch.schema(), columns).context(ArrowSnafu)
}
