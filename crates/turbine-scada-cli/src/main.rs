//! `scada`: terminal front end for the wind-turbine SCADA dashboard.

mod engine;
mod error;
mod output;
mod session;
mod shell;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use snafu::ResultExt;
use turbine_scada_core::{
    RangeFilter, range::parse_bound, readout::column_description, timestamp::DISPLAY_FORMAT,
};

use crate::{
    engine::run_series,
    error::{CliResult, InvalidBoundSnafu, MissingTimestampSnafu},
    output::{
        SeriesOpts, page_output, print_series_result, write_point_reading, write_series_result,
    },
    session::{DashboardSession, load_table, resolve_config},
    shell::cmd_shell,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormatArg {
    Csv,
    Jsonl,
}

impl From<OutputFormatArg> for crate::output::OutputFormat {
    fn from(v: OutputFormatArg) -> Self {
        match v {
            OutputFormatArg::Csv => crate::output::OutputFormat::Csv,
            OutputFormatArg::Jsonl => crate::output::OutputFormat::Jsonl,
        }
    }
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// SCADA CSV export with a day-first time column
    #[arg(long)]
    csv: PathBuf,

    /// Optional JSON dashboard config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the time column name (default: from config, else "Time")
    #[arg(long = "time-column")]
    time_column: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the selectable sensor columns
    Columns {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Print the chart series for one column within a date range
    Series {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(long)]
        column: String,

        /// Exclusive lower bound (e.g. "2014-05-01 00:00:00")
        #[arg(long)]
        start: Option<String>,

        /// Inclusive upper bound; ignored without --start
        #[arg(long)]
        end: Option<String>,

        #[arg(long, default_value_t = false)]
        timing: bool,

        /// Page output through `less -S` (no truncation; horizontal scroll)
        #[arg(long, default_value_t = false)]
        pager: bool,

        #[arg(long, default_value_t = 10)]
        max_rows: usize,

        #[arg(long)]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormatArg::Csv)]
        format: OutputFormatArg,
    },

    /// Print the four gauge values at an exact timestamp
    Point {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(long)]
        at: String,
    },

    /// Interactive shell (keeps the table loaded; select, filter, click)
    Shell {
        #[command(flatten)]
        source: SourceArgs,

        /// Optional history file path
        #[arg(long)]
        history: Option<PathBuf>,
    },
}

#[derive(Debug, Parser)]
#[command(name = "scada", version, about)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

struct SeriesArgs {
    column: String,
    start: Option<String>,
    end: Option<String>,
    timing: bool,
    pager: bool,
    max_rows: usize,
    output: Option<PathBuf>,
    format: OutputFormatArg,
}

fn open_session(source: &SourceArgs) -> CliResult<DashboardSession> {
    let cfg = resolve_config(source.config.as_deref(), source.time_column.as_deref())?;
    let table = load_table(&source.csv, &cfg)?;
    Ok(DashboardSession::new(table, cfg.gauges))
}

fn cmd_columns(source: &SourceArgs) -> CliResult<()> {
    let session = open_session(source)?;
    let table = session.table();
    for col in table.columns() {
        match column_description(col) {
            Some(desc) => println!("{col}  ({desc})"),
            None => println!("{col}"),
        }
    }

    println!("rows: {}", table.num_rows());
    if let Some((first, last)) = table.time_bounds() {
        println!(
            "range: {} .. {}",
            first.format(DISPLAY_FORMAT),
            last.format(DISPLAY_FORMAT)
        );
    }
    Ok(())
}

fn cmd_series(source: &SourceArgs, args: SeriesArgs) -> CliResult<()> {
    let range =
        RangeFilter::parse(args.start.as_deref(), args.end.as_deref()).context(InvalidBoundSnafu)?;

    let mut session = open_session(source)?;
    session.select_column(&args.column);
    session.set_range(range);

    let opts = SeriesOpts {
        timing: args.timing,
        max_rows: args.max_rows,
        output: args.output,
        format: args.format.into(),
    };

    let res = run_series(&session, &opts)?;
    if args.pager {
        let mut buf = Vec::new();
        write_series_result(&res, &opts, &mut buf)?;
        let rendered = String::from_utf8_lossy(&buf);
        page_output(&rendered)?;
    } else {
        print_series_result(&res, &opts)?;
    }
    Ok(())
}

fn cmd_point(source: &SourceArgs, at: &str) -> CliResult<()> {
    let ts = parse_bound(Some(at))
        .context(InvalidBoundSnafu)?
        .ok_or_else(|| MissingTimestampSnafu.build())?;

    let session = open_session(source)?;
    let reading = session.click(ts);
    let matched = session.table().row_at(ts).is_some();

    let label = ts.format(DISPLAY_FORMAT).to_string();
    write_point_reading(&label, &reading, matched, &mut std::io::stdout())
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Command::Columns { source } => cmd_columns(&source),

        Command::Series {
            source,
            column,
            start,
            end,
            timing,
            pager,
            max_rows,
            output,
            format,
        } => cmd_series(
            &source,
            SeriesArgs {
                column,
                start,
                end,
                timing,
                pager,
                max_rows,
                output,
                format,
            },
        ),

        Command::Point { source, at } => cmd_point(&source, &at),

        Command::Shell { source, history } => {
            let session = open_session(&source)?;
            cmd_shell(session, &source.csv, history)
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
