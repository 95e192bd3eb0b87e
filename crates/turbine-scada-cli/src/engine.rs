use std::{fs::File, path::Path, time::Instant};

use arrow::{
    array::RecordBatch,
    error::ArrowError,
    util::display::{ArrayFormatter, FormatOptions},
};
use log::debug;
use snafu::ResultExt;
use turbine_scada_core::timestamp::DISPLAY_FORMAT;

use crate::{
    error::{ArrowSnafu, CliResult, CreateOutputSnafu, WriteOutputSnafu},
    output::{OutputFormat, SeriesOpts, SeriesResult},
    session::DashboardSession,
};

enum OutputWriter {
    Csv(Box<arrow_csv::Writer<File>>),
    Jsonl(Box<arrow_json::LineDelimitedWriter<File>>),
}

impl OutputWriter {
    fn create(path: &Path, format: OutputFormat) -> CliResult<Self> {
        let file = File::create(path).context(CreateOutputSnafu {
            path: path.display().to_string(),
        })?;

        match format {
            OutputFormat::Csv => {
                let writer = arrow_csv::WriterBuilder::new()
                    .with_timestamp_format(DISPLAY_FORMAT.to_string())
                    .build(file);
                Ok(OutputWriter::Csv(Box::new(writer)))
            }
            OutputFormat::Jsonl => Ok(OutputWriter::Jsonl(Box::new(
                arrow_json::LineDelimitedWriter::new(file),
            ))),
        }
    }

    fn write_batch(&mut self, batch: &RecordBatch) -> Result<(), ArrowError> {
        match self {
            OutputWriter::Csv(w) => w.write(batch),
            OutputWriter::Jsonl(w) => w.write_batches(&[batch]),
        }
    }

    fn finish(self) -> Result<(), ArrowError> {
        match self {
            OutputWriter::Csv(_) => Ok(()),
            OutputWriter::Jsonl(mut w) => w.finish(),
        }
    }
}

fn write_output(path: &Path, format: OutputFormat, batch: &RecordBatch) -> CliResult<()> {
    let write_ctx = || WriteOutputSnafu {
        path: path.display().to_string(),
    };

    let mut out = OutputWriter::create(path, format)?;
    out.write_batch(batch).context(write_ctx())?;
    out.finish().context(write_ctx())?;
    debug!("Wrote {} rows to {}", batch.num_rows(), path.display());
    Ok(())
}

fn preview_rows(batch: &RecordBatch, max_rows: usize) -> Result<Vec<Vec<String>>, ArrowError> {
    let options = FormatOptions::default().with_timestamp_format(Some(DISPLAY_FORMAT));
    let formatters = batch
        .columns()
        .iter()
        .map(|col| ArrayFormatter::try_new(col.as_ref(), &options))
        .collect::<Result<Vec<_>, ArrowError>>()?;

    let rows_to_take = max_rows.min(batch.num_rows());
    let mut rows = Vec::with_capacity(rows_to_take);
    for row_idx in 0..rows_to_take {
        let mut row = Vec::with_capacity(formatters.len());
        for formatter in &formatters {
            row.push(formatter.value(row_idx).try_to_string()?);
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Evaluate the session's current chart series, writing it out if requested.
pub fn run_series(session: &DashboardSession, opts: &SeriesOpts) -> CliResult<SeriesResult> {
    let start = Instant::now();

    let series = session.series();
    let batch = series
        .to_record_batch(session.table().time_column())
        .context(ArrowSnafu)?;

    if let Some(path) = &opts.output {
        write_output(path, opts.format, &batch)?;
    }

    let preview_rows = preview_rows(&batch, opts.max_rows).context(ArrowSnafu)?;
    let columns = if series.column().is_empty() {
        Vec::new()
    } else {
        batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().to_string())
            .collect()
    };

    let elapsed = opts.timing.then(|| start.elapsed());

    Ok(SeriesResult {
        column_readout: session.column_readout(),
        range_readout: session.range_readout(),
        columns,
        preview_rows,
        total_rows: batch.num_rows() as u64,
        elapsed,
    })
}
