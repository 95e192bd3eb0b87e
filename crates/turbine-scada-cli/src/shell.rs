use std::path::{Path, PathBuf};

use rustyline::{DefaultEditor, error::ReadlineError};
use snafu::ResultExt;
use turbine_scada_core::{
    PointReading, RangeFilter, range::parse_bound, readout::column_description,
    timestamp::DISPLAY_FORMAT,
};

use crate::{
    engine::run_series,
    error::{CliResult, ReadlineSnafu},
    output::{
        OutputFormat, SeriesOpts, SeriesResult, page_output, preview_message,
        print_series_result, render_preview, write_point_reading, write_series_summary,
    },
    session::DashboardSession,
};

const DEFAULT_MAX_ROWS: usize = 10;

enum CommandAction {
    Continue,
    Break,
}

struct CommandResult {
    action: CommandAction,
    series_result: Option<SeriesResult>,
    reading: Option<PointReading>,
}

impl CommandResult {
    fn next() -> Self {
        Self {
            action: CommandAction::Continue,
            series_result: None,
            reading: None,
        }
    }

    fn exit() -> Self {
        Self {
            action: CommandAction::Break,
            ..Self::next()
        }
    }
}

struct ShellContext {
    session: DashboardSession,
    timing: bool,
    pager: bool,
}

fn print_help() {
    println!(
        r#"commands:
  columns                 list selectable columns
  column <name>           select the charted column (quote names freely)
  column                  clear the selection
  range [--start TS] [--end TS]
  range --clear           drop both bounds
  show [--max-rows N] [--format csv|jsonl] [--output PATH]
  click <ts>              gauge values at an exact timestamp
  bounds                  first and last timestamp in the table
  \timing                 toggle per-command elapsed time
  \pager                  toggle pager output (less -S)
  help
  exit | quit
notes:
  - timestamps accept `YYYY-MM-DD HH:MM:SS` or day-first `DD/MM/YYYY HH:MM:SS`
  - start is exclusive, end is inclusive; an end without a start is ignored
"#
    );
}

fn lex(input: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    loop {
        while chars.peek().is_some_and(|ch| ch.is_ascii_whitespace()) {
            chars.next();
        }
        let Some(&first) = chars.peek() else {
            break;
        };

        let mut value = String::new();
        if first == '"' || first == '\'' {
            chars.next();
            let mut closed = false;
            while let Some(ch) = chars.next() {
                if ch == first {
                    closed = true;
                    break;
                }
                if ch == '\\' {
                    let esc = chars
                        .next()
                        .ok_or_else(|| "unterminated escape in quoted token".to_string())?;
                    value.push(esc);
                    continue;
                }
                value.push(ch);
            }
            if !closed {
                return Err("unterminated quoted token".to_string());
            }
        } else {
            while let Some(&ch) = chars.peek() {
                if ch.is_ascii_whitespace() {
                    break;
                }
                chars.next();
                if ch == '\\' {
                    let esc = chars
                        .next()
                        .ok_or_else(|| "unterminated escape in token".to_string())?;
                    value.push(esc);
                    continue;
                }
                value.push(ch);
            }
        }
        tokens.push(value);
    }

    Ok(tokens)
}

fn parse_format(raw: &str) -> Result<OutputFormat, String> {
    match raw.to_ascii_lowercase().as_str() {
        "csv" => Ok(OutputFormat::Csv),
        "jsonl" => Ok(OutputFormat::Jsonl),
        other => Err(format!("unknown format: {other}")),
    }
}

/// Join the tokens following a flag up to the next `--flag`.
///
/// Lets `--start 2014-05-01 00:10:00` work without quoting.
fn flag_value<'a>(
    flag: &str,
    iter: &mut std::iter::Peekable<impl Iterator<Item = &'a String>>,
) -> Result<String, String> {
    let mut parts = Vec::new();
    while let Some(tok) = iter.peek() {
        if tok.starts_with("--") {
            break;
        }
        parts.push(tok.as_str());
        iter.next();
    }
    if parts.is_empty() {
        return Err(format!("{flag} requires a value"));
    }
    Ok(parts.join(" "))
}

fn parse_range_command(rest: &str) -> Result<RangeFilter, String> {
    let tokens = lex(rest)?;
    if tokens.len() == 1 && tokens[0] == "--clear" {
        return Ok(RangeFilter::ALL);
    }

    let mut start = None;
    let mut end = None;
    let mut iter = tokens.iter().peekable();
    while let Some(tok) = iter.next() {
        match tok.as_str() {
            "--start" => start = Some(flag_value("--start", &mut iter)?),
            "--end" => end = Some(flag_value("--end", &mut iter)?),
            other => return Err(format!("unknown range flag: {other}")),
        }
    }

    RangeFilter::parse(start.as_deref(), end.as_deref()).map_err(|e| e.to_string())
}

fn parse_show_command(rest: &str) -> Result<SeriesOpts, String> {
    let tokens = lex(rest)?;
    let mut opts = SeriesOpts {
        max_rows: DEFAULT_MAX_ROWS,
        ..SeriesOpts::default()
    };

    let mut iter = tokens.iter();
    while let Some(tok) = iter.next() {
        match tok.as_str() {
            "--max-rows" => {
                let raw = iter.next().ok_or("--max-rows requires a value")?;
                opts.max_rows = raw
                    .parse::<usize>()
                    .map_err(|_| format!("invalid --max-rows: {raw}"))?;
            }
            "--format" => {
                let raw = iter.next().ok_or("--format requires a value")?;
                opts.format = parse_format(raw)?;
            }
            "--output" => {
                let raw = iter.next().ok_or("--output requires a value")?;
                opts.output = Some(PathBuf::from(raw));
            }
            other => return Err(format!("unknown show flag: {other}")),
        }
    }

    Ok(opts)
}

fn show_series(ctx: &ShellContext, mut opts: SeriesOpts) -> Option<SeriesResult> {
    opts.timing = ctx.timing;
    match run_series(&ctx.session, &opts) {
        Ok(res) => {
            if ctx.pager {
                println!("{}", res.column_readout);
                println!("{}", res.range_readout);
                if let Some(rendered) = render_preview(&res, &opts) {
                    let _ = page_output(&rendered);
                }
                if let Some(message) = preview_message(&res, &opts) {
                    println!("{message}");
                }
                let _ = write_series_summary(&res, &opts, &mut std::io::stdout());
            } else {
                let _ = print_series_result(&res, &opts);
            }
            Some(res)
        }
        Err(e) => {
            println!("{e}");
            None
        }
    }
}

fn process_command(ctx: &mut ShellContext, trimmed: &str) -> CliResult<CommandResult> {
    if trimmed == "exit" || trimmed == "quit" {
        return Ok(CommandResult::exit());
    }

    if trimmed == "help" {
        print_help();
        return Ok(CommandResult::next());
    }

    if trimmed == r"\timing" {
        ctx.timing = !ctx.timing;
        println!("timing: {}", if ctx.timing { "on" } else { "off" });
        return Ok(CommandResult::next());
    }

    if trimmed == r"\pager" {
        ctx.pager = !ctx.pager;
        println!("pager: {}", if ctx.pager { "on" } else { "off" });
        return Ok(CommandResult::next());
    }

    if trimmed == "columns" {
        for col in ctx.session.table().columns() {
            match column_description(col) {
                Some(desc) => println!("{col}  ({desc})"),
                None => println!("{col}"),
            }
        }
        return Ok(CommandResult::next());
    }

    if trimmed == "bounds" {
        match ctx.session.table().time_bounds() {
            Some((first, last)) => println!(
                "rows: {}\nfirst: {}\nlast: {}",
                ctx.session.table().num_rows(),
                first.format(DISPLAY_FORMAT),
                last.format(DISPLAY_FORMAT)
            ),
            None => println!("rows: 0"),
        }
        return Ok(CommandResult::next());
    }

    if trimmed == "column" {
        println!("{}", ctx.session.select_column(""));
        return Ok(CommandResult::next());
    }

    if let Some(rest) = trimmed.strip_prefix("column ") {
        match lex(rest) {
            Ok(tokens) => println!("{}", ctx.session.select_column(&tokens.join(" "))),
            Err(e) => println!("{e}"),
        }
        return Ok(CommandResult::next());
    }

    if trimmed == "range" {
        println!("{}", ctx.session.range_readout());
        return Ok(CommandResult::next());
    }

    if let Some(rest) = trimmed.strip_prefix("range ") {
        match parse_range_command(rest) {
            Ok(range) => println!("{}", ctx.session.set_range(range)),
            Err(e) => println!("{e}"),
        }
        return Ok(CommandResult::next());
    }

    if trimmed == "show" || trimmed.starts_with("show ") {
        let rest = trimmed.strip_prefix("show").unwrap_or_default();
        let opts = match parse_show_command(rest) {
            Ok(opts) => opts,
            Err(e) => {
                println!("{e}");
                return Ok(CommandResult::next());
            }
        };
        return Ok(CommandResult {
            series_result: show_series(ctx, opts),
            ..CommandResult::next()
        });
    }

    if let Some(rest) = trimmed.strip_prefix("click ") {
        let at = match lex(rest).map(|tokens| tokens.join(" ")) {
            Ok(at) => at,
            Err(e) => {
                println!("{e}");
                return Ok(CommandResult::next());
            }
        };
        let ts = match parse_bound(Some(at.as_str())) {
            Ok(Some(ts)) => ts,
            Ok(None) => {
                println!("click requires a timestamp");
                return Ok(CommandResult::next());
            }
            Err(e) => {
                println!("{e}");
                return Ok(CommandResult::next());
            }
        };

        let reading = ctx.session.click(ts);
        let matched = ctx.session.table().row_at(ts).is_some();
        let label = ts.format(DISPLAY_FORMAT).to_string();
        let _ = write_point_reading(&label, &reading, matched, &mut std::io::stdout());
        return Ok(CommandResult {
            reading: Some(reading),
            ..CommandResult::next()
        });
    }

    println!("unknown command. type 'help'.");
    Ok(CommandResult::next())
}

fn prompt(ctx: &ShellContext) -> String {
    let selected = match ctx.session.selected() {
        "" => "-",
        name => name,
    };
    match (ctx.timing, ctx.pager) {
        (true, true) => format!("scada[{selected}](timing,pager)> "),
        (true, false) => format!("scada[{selected}](timing)> "),
        (false, true) => format!("scada[{selected}](pager)> "),
        (false, false) => format!("scada[{selected}]> "),
    }
}

fn default_history_path(csv: &Path) -> PathBuf {
    csv.parent()
        .unwrap_or_else(|| Path::new("."))
        .join(".scada_history")
}

/// Run the interactive dashboard shell until `exit`, Ctrl-C or Ctrl-D.
pub fn cmd_shell(session: DashboardSession, csv: &Path, history: Option<PathBuf>) -> CliResult<()> {
    let history_path = history.unwrap_or_else(|| default_history_path(csv));

    let mut rl = DefaultEditor::new().context(ReadlineSnafu)?;

    // history best-effort
    let _ = rl.load_history(&history_path);

    let mut ctx = ShellContext {
        session,
        timing: false,
        pager: false,
    };

    println!("scada shell");
    println!("csv: {}", csv.display());
    println!(
        "rows: {}, columns: {}",
        ctx.session.table().num_rows(),
        ctx.session.table().columns().len()
    );
    println!("type 'help' for commands\n");

    loop {
        let line = match rl.readline(&prompt(&ctx)) {
            Ok(l) => l,
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(e) => {
                println!("readline error: {e}");
                break;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let _ = rl.add_history_entry(trimmed);

        let result = process_command(&mut ctx, trimmed)?;
        if matches!(result.action, CommandAction::Break) {
            break;
        }
    }

    let _ = rl.save_history(&history_path);

    Ok(())
}
