use anyhow::{Context, Result};
use std::env;
use std::io::{self, BufRead};
use std::process;
use tagbridge::env_util::{CONFIG_PATH_ENV, LOG_LEVEL_ENV, STRICT_INPUT_ENV};
use tagbridge::settings;
use tagbridge::sink::JsonLinesSink;
use tagbridge::{Dispatcher, FieldSet};
use tracing_subscriber::EnvFilter;

const EXIT_FATAL: i32 = 1;
const EXIT_UNDECODABLE_INPUT: i32 = 2;

fn print_usage() {
    println!("Usage: tagbridge < payloads.jsonl");
    println!();
    println!("Reads one JSON remote-command payload per line from stdin and writes one");
    println!("JSON object per analytics call to stdout.");
    println!();
    println!("Environment:");
    println!("  {CONFIG_PATH_ENV}       settings file (default: <config dir>/tagbridge/bridge.toml)");
    println!("  {LOG_LEVEL_ENV}    initial log level (error|warning|notice|info|debug|min|max)");
    println!("  {STRICT_INPUT_ENV} exit with status 2 on an undecodable payload line");
    println!("  RUST_LOG                diagnostic filter for stderr (default: tagbridge=info)");
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tagbridge=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("tagbridge: {err:#}");
            process::exit(EXIT_FATAL);
        }
    }
}

fn run() -> Result<i32> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_usage();
        return Ok(0);
    }
    if args.iter().any(|arg| arg == "--version" || arg == "-V") {
        println!("tagbridge {}", env!("CARGO_PKG_VERSION"));
        return Ok(0);
    }
    if let Some(arg) = args.first() {
        eprintln!("tagbridge: unexpected argument `{arg}`; see --help");
        return Ok(EXIT_FATAL);
    }

    init_tracing();
    let settings = settings::load()?;
    let stdout = io::stdout().lock();
    let mut dispatcher = Dispatcher::new(JsonLinesSink::new(stdout))
        .with_log_level(settings.log_level)
        .with_separator(settings.command_separator);

    for (index, line) in io::stdin().lock().lines().enumerate() {
        let line_number = index + 1;
        let line = line.context("failed to read payload from stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let payload: FieldSet = match serde_json::from_str(&line) {
            Ok(payload) => payload,
            Err(err) if settings.strict_input => {
                eprintln!("tagbridge: line {line_number}: undecodable payload: {err}");
                return Ok(EXIT_UNDECODABLE_INPUT);
            }
            Err(err) => {
                tracing::warn!(line = line_number, "skipping undecodable payload: {err}");
                continue;
            }
        };
        let report = dispatcher.dispatch(&payload);
        tracing::debug!(
            line = line_number,
            executed = report.executed.len(),
            failed = report.failures.len(),
            "dispatched payload"
        );
        if dispatcher.sink().failed() {
            break;
        }
    }

    dispatcher
        .into_sink()
        .finish()
        .context("failed writing analytics calls to stdout")?;
    Ok(0)
}
