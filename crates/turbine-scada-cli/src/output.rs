use std::{
    io::Write,
    path::PathBuf,
    process::{Command, Stdio},
    time::Duration,
};

use tabled::{
    builder::Builder,
    settings::{Style, object::Rows, style::LineText, width::MinWidth},
};
use turbine_scada_core::PointReading;

use crate::error::{CliError, CliResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Jsonl,
}

#[derive(Debug, Clone)]
pub struct SeriesOpts {
    pub timing: bool,
    pub max_rows: usize,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
}

impl Default for SeriesOpts {
    fn default() -> Self {
        Self {
            timing: false,
            max_rows: 10,
            output: None,
            format: OutputFormat::Csv,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SeriesResult {
    pub column_readout: String,
    pub range_readout: String,
    pub columns: Vec<String>,
    pub preview_rows: Vec<Vec<String>>,
    pub total_rows: u64,
    pub elapsed: Option<Duration>,
}

fn write_err(e: std::io::Error) -> CliError {
    CliError::Io {
        message: "failed to write output".to_string(),
        source: e,
    }
}

fn render_table(columns: &[String], rows: &[Vec<String>]) -> String {
    if columns.is_empty() {
        return String::new();
    }

    const PREVIEW_LABEL: &str = "Series preview";
    const PREVIEW_OFFSET: usize = 6;
    let min_width = PREVIEW_OFFSET + PREVIEW_LABEL.len() + 4;

    let mut builder = Builder::default();
    builder.push_record(columns);
    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();

    table.with(Style::rounded());
    table.with(MinWidth::new(min_width));
    table.with(LineText::new(PREVIEW_LABEL, Rows::first()).offset(PREVIEW_OFFSET));
    // LineText re-estimates dimensions, so re-apply MinWidth afterwards.
    table.with(MinWidth::new(min_width));
    table.to_string()
}

pub fn render_preview(res: &SeriesResult, opts: &SeriesOpts) -> Option<String> {
    if !res.preview_rows.is_empty() {
        return Some(render_table(&res.columns, &res.preview_rows));
    }

    if opts.max_rows == 0 && res.total_rows > 0 {
        return Some(render_table(&res.columns, &[]));
    }

    None
}

pub fn preview_message(res: &SeriesResult, opts: &SeriesOpts) -> Option<String> {
    if opts.max_rows == 0 && res.total_rows > 0 {
        return Some("(preview suppressed; use --max-rows > 0)".to_string());
    }

    if res.total_rows == 0 {
        return Some("(no rows)".to_string());
    }

    None
}

pub fn write_series_summary<W: Write>(
    res: &SeriesResult,
    opts: &SeriesOpts,
    out: &mut W,
) -> CliResult<()> {
    writeln!(out, "total_rows: {}", res.total_rows).map_err(write_err)?;

    if let Some(d) = res.elapsed {
        writeln!(out, "elapsed_ms: {}", d.as_millis()).map_err(write_err)?;
    }

    if let Some(path) = &opts.output {
        writeln!(out, "wrote: {} ({:?})", path.display(), opts.format).map_err(write_err)?;
    }

    Ok(())
}

pub fn write_series_result<W: Write>(
    res: &SeriesResult,
    opts: &SeriesOpts,
    out: &mut W,
) -> CliResult<()> {
    writeln!(out, "{}", res.column_readout).map_err(write_err)?;
    writeln!(out, "{}", res.range_readout).map_err(write_err)?;

    if let Some(rendered) = render_preview(res, opts) {
        writeln!(out, "{rendered}").map_err(write_err)?;
    }

    if let Some(message) = preview_message(res, opts) {
        writeln!(out, "{message}").map_err(write_err)?;
    }

    write_series_summary(res, opts, out)
}

pub fn print_series_result(res: &SeriesResult, opts: &SeriesOpts) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    write_series_result(res, opts, &mut stdout)
}

/// Gauge panel: one line per gauge in fixed order.
pub fn write_point_reading<W: Write>(
    at: &str,
    reading: &PointReading,
    matched: bool,
    out: &mut W,
) -> CliResult<()> {
    writeln!(out, "at: {at}").map_err(write_err)?;
    for (spec, value) in reading.gauges() {
        writeln!(
            out,
            "{}: {} {} (dial {}..{})",
            spec.label, value, spec.units, spec.min, spec.max
        )
        .map_err(write_err)?;
    }
    if !matched {
        writeln!(out, "(no sample at this timestamp; gauges read zero)").map_err(write_err)?;
    }
    Ok(())
}

pub fn page_output(text: &str) -> CliResult<()> {
    let io_err = |e: std::io::Error| CliError::Io {
        message: "failed to write pager output".to_string(),
        source: e,
    };

    let mut child = match Command::new("less").arg("-S").stdin(Stdio::piped()).spawn() {
        Ok(child) => child,
        Err(_) => {
            let mut stdout = std::io::stdout();
            stdout.write_all(text.as_bytes()).map_err(io_err)?;
            return Ok(());
        }
    };

    if let Some(stdin) = child.stdin.as_mut() {
        stdin.write_all(text.as_bytes()).map_err(io_err)?;
    }

    child.wait().map_err(|e| CliError::Io {
        message: "failed to wait for pager".to_string(),
        source: e,
    })?;
    Ok(())
}
