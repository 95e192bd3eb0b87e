use arrow::error::ArrowError;
use snafu::Snafu;
use turbine_scada_core::{ConfigError, LoadError, ParseBoundError};

pub type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CliError {
    #[snafu(display("Failed to load config {path}: {source}"))]
    LoadConfig { path: String, source: ConfigError },

    #[snafu(display(
        "Failed to load SCADA table from {csv}: {source}. \
         Ensure the file is a CSV export with a day-first time column."
    ))]
    LoadTable {
        csv: String,
        #[snafu(source(from(LoadError, Box::new)))]
        source: Box<LoadError>,
    },

    #[snafu(display("{source}"))]
    InvalidBound { source: ParseBoundError },

    #[snafu(display("Missing timestamp for --at"))]
    MissingTimestamp,

    #[snafu(display("Failed to build output batch: {source}"))]
    Arrow { source: ArrowError },

    #[snafu(display("Failed to create output file: {path}"))]
    CreateOutput {
        path: String,
        source: std::io::Error,
    },

    #[snafu(display("Failed to write output: {path}"))]
    WriteOutput {
        path: String,
        source: ArrowError,
    },

    #[snafu(display("Failed to initialize readline: {source}"))]
    Readline {
        source: rustyline::error::ReadlineError,
    },

    #[snafu(display("Internal IO error: {message}"))]
    Io {
        message: String,
        source: std::io::Error,
    },
}
