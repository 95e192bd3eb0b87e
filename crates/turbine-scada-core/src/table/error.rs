//! Error types and SNAFU context selectors for the `table` module.
//!
//! Loading is the only fallible stage of the table's life: once a
//! `TimeSeriesTable` exists, series queries and point lookups are infallible
//! (unknown columns and unmatched timestamps produce empty/zero results).
//! `QueryError` only covers the Arrow-kernel reference scan.

use arrow::error::ArrowError;
use snafu::prelude::*;

/// Errors from building a `TimeSeriesTable` out of a CSV source.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum LoadError {
    /// The CSV file could not be read from disk.
    #[snafu(display("Failed to read CSV file {path}: {source}"))]
    ReadFile {
        /// Path of the CSV file.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// An in-memory reader failed while buffering the CSV input.
    #[snafu(display("Failed to read CSV input: {source}"))]
    ReadInput {
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The header row could not be parsed.
    #[snafu(display("Failed to read CSV header: {source}"))]
    CsvHeader {
        /// Underlying Arrow CSV error.
        source: ArrowError,
    },

    /// The configured time column is not in the header.
    #[snafu(display("Time column '{column}' not found in CSV header (found: {available})"))]
    MissingTimeColumn {
        /// Configured time column name.
        column: String,
        /// Comma-separated header names, for the error message.
        available: String,
    },

    /// The header names the same column twice.
    #[snafu(display("Duplicate column '{column}' in CSV header"))]
    DuplicateColumn {
        /// The repeated column name.
        column: String,
    },

    /// A data row could not be decoded (for example a non-numeric sensor cell).
    #[snafu(display("Failed to decode CSV rows: {source}"))]
    CsvRead {
        /// Underlying Arrow CSV error.
        source: ArrowError,
    },

    /// An in-memory column does not have the type the table layout requires.
    #[snafu(display("Column '{column}' has unexpected type (expected {expected})"))]
    ColumnType {
        /// Column name.
        column: String,
        /// Expected Arrow type, for the error message.
        expected: &'static str,
    },

    /// Arrow compute error while converting, concatenating or sorting batches.
    #[snafu(display("Arrow error while building table: {source}"))]
    Arrow {
        /// Underlying Arrow error.
        source: ArrowError,
    },

    /// More rows than the sort indices can address.
    #[snafu(display("CSV has {rows} rows; at most {} are supported", u32::MAX))]
    TooManyRows {
        /// Number of rows read.
        rows: usize,
    },
}

/// Errors from the Arrow-kernel reference scan.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum QueryError {
    /// Arrow compute error while evaluating the range mask.
    #[snafu(display("Arrow error while filtering series: {source}"))]
    Filter {
        /// Underlying Arrow error.
        source: ArrowError,
    },

    /// A filtered column came back with an unexpected type.
    #[snafu(display("Filtered column '{column}' has unexpected type"))]
    FilteredType {
        /// Column name.
        column: String,
    },
}
