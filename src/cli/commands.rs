//! CLI command implementations
//!
//! `check` grades one pair against a read-only SQLite file and prints the
//! outcome. `batch` grades JSON-line cases concurrently, each against its own
//! read-only handle, and prints outcomes in input order.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use futures_util::StreamExt;
use serde_json::Value;

use crate::config::CheckConfig;
use crate::executor::SqliteEngine;
use crate::guard::{CheckOutcome, Checker};
use crate::observability::{log_event_with_fields, Event, Logger, Timer};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_cases, write_line, BatchCase, BatchResult};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Check {
            db,
            predicted,
            reference,
            method,
            timeout,
            config,
            normalize,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(method) = method {
                config.method = method;
            }
            if let Some(timeout) = timeout {
                config.deadline_secs = timeout;
            }
            config.normalize_operators |= normalize;

            let outcome = check(&config, &db, &predicted, &reference)?;
            write_line(&mut io::stdout(), &outcome)
        }
        Command::Batch { db, config, jobs } => {
            let config = load_config(config.as_deref())?;
            let stdin = io::stdin();
            batch(
                &config,
                db.as_deref(),
                jobs,
                stdin.lock(),
                &mut io::stdout(),
            )?;
            Ok(())
        }
    }
}

/// Load the config file (or defaults) and apply its log level
pub fn load_config(path: Option<&Path>) -> CliResult<CheckConfig> {
    let config = match path {
        Some(path) => CheckConfig::load(path)?,
        None => CheckConfig::default(),
    };
    Logger::set_min_severity(config.severity()?);

    if let Some(path) = path {
        let path = path.display().to_string();
        log_event_with_fields(
            Event::ConfigLoaded,
            &[("method", config.method.as_str()), ("path", path.as_str())],
        );
    }
    Ok(config)
}

/// Grade one pair against a database file
///
/// A database that cannot be opened is a CLI error; everything after that
/// is reported through the outcome.
pub fn check(
    config: &CheckConfig,
    db: &Path,
    predicted: &str,
    reference: &str,
) -> CliResult<CheckOutcome> {
    let engine = SqliteEngine::open_read_only(db).map_err(|fault| {
        CliError::database_error(format!("{}: {}", db.display(), fault))
    })?;
    let checker = Checker::new(config.clone());
    Ok(checker.check(Arc::new(engine), predicted, reference))
}

/// Grade every case read from `input`, writing one line per case to `output`
///
/// Cases run `jobs` at a time on blocking worker threads. Output keeps input
/// order. Returns the number of cases graded.
pub fn batch<R: BufRead, W: Write>(
    config: &CheckConfig,
    default_db: Option<&Path>,
    jobs: usize,
    input: R,
    output: &mut W,
) -> CliResult<usize> {
    if jobs == 0 {
        return Err(CliError::config_error("--jobs must be > 0"));
    }

    let cases = read_cases(input)?
        .into_iter()
        .enumerate()
        .map(|(index, case)| {
            match case.db.clone().or_else(|| default_db.map(Path::to_path_buf)) {
                Some(db) => Ok((case, db)),
                None => Err(CliError::config_error(format!(
                    "case {} names no database and no --db was given",
                    index
                ))),
            }
        })
        .collect::<CliResult<Vec<_>>>()?;

    let total = cases.len();
    let total_field = total.to_string();
    let jobs_field = jobs.to_string();
    let timer = Timer::new();
    log_event_with_fields(
        Event::BatchBegin,
        &[("cases", total_field.as_str()), ("jobs", jobs_field.as_str())],
    );

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::runtime_error(format!("Failed to create tokio runtime: {}", e)))?;

    let checker = Arc::new(Checker::new(config.clone()));

    runtime.block_on(async {
        let mut results = futures_util::stream::iter(cases.into_iter().enumerate().map(
            |(index, (case, db))| {
                let checker = Arc::clone(&checker);
                async move {
                    let id = case.id.clone().unwrap_or_else(|| Value::from(index));
                    let task = tokio::task::spawn_blocking(move || grade_case(&checker, case, &db));
                    let outcome = match task.await {
                        Ok(outcome) => outcome,
                        Err(e) => CheckOutcome::error(format!("worker failed: {}", e)),
                    };
                    BatchResult { id, outcome }
                }
            },
        ))
        .buffered(jobs);

        while let Some(result) = results.next().await {
            write_line(output, &result)?;
        }
        Ok::<(), CliError>(())
    })?;

    let elapsed = timer.elapsed_ms();
    log_event_with_fields(
        Event::BatchComplete,
        &[("cases", total_field.as_str()), ("elapsed_ms", elapsed.as_str())],
    );
    Ok(total)
}

fn grade_case(checker: &Checker, case: BatchCase, db: &Path) -> CheckOutcome {
    let engine = match SqliteEngine::open_read_only(db) {
        Ok(engine) => Arc::new(engine),
        Err(fault) => return CheckOutcome::error(fault.to_string()),
    };

    let config = checker.config();
    let deadline_secs = case.timeout.unwrap_or(config.deadline_secs);
    let method = case.method.as_deref().unwrap_or(&config.method);
    checker.check_with(engine, &case.predicted, &case.reference, deadline_secs, method)
}
