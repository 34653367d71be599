//! CLI command handling
//!
//! Dispatches CLI commands and formats output.

mod output;

pub use output::PrettySink;

use std::io::Read;
use std::path::Path;

use crate::commands::Commands;
use crate::common::config::{Config, OutputFormat};
use crate::common::{Error, Result};
use crate::reporter::{FailureRecord, JsonLinesSink};
use crate::stack::{sanitize_error_with, CommandError, StackFilter};
use crate::testing::{load_scenario, run_scenario, ReplaySummary};

/// Dispatch a CLI command, returning the process exit code
pub fn dispatch(command: Commands) -> Result<i32> {
    let config = Config::load()?;
    let filter = StackFilter::with_extra_patterns(&config.stack.extra_noise_patterns)?;

    match command {
        Commands::Replay {
            scenario,
            cid,
            no_clean_stack,
            format,
        } => {
            let scenario = load_scenario(&scenario)?;
            let mut options = scenario.reporter_options(&config.reporter);
            if let Some(cid) = cid {
                options.cid = cid;
            }
            if no_clean_stack {
                options.clean_stack = false;
            }

            let stdout = std::io::stdout().lock();
            let summary = match format.unwrap_or(config.output.format) {
                OutputFormat::Json => {
                    run_scenario(scenario, options, filter, JsonLinesSink::new(stdout)).0
                }
                OutputFormat::Pretty => {
                    let summary = run_scenario(scenario, options, filter, PrettySink::new(stdout)).0;
                    print_summary(&summary);
                    summary
                }
            };

            Ok(if summary.passed() { 0 } else { 1 })
        }

        Commands::CleanStack { file } => {
            let trace = match file {
                Some(path) => read_file(&path)?,
                None => {
                    let mut trace = String::new();
                    std::io::stdin().read_to_string(&mut trace)?;
                    trace
                }
            };

            println!("{}", filter.clean_trace(trace.trim_end()));
            Ok(0)
        }

        Commands::MergeStack {
            saved,
            command,
            name,
            message,
        } => {
            let saved = FailureRecord::new("").with_stack(read_file(&saved)?);
            let command_error = match command {
                Some(path) => CommandError::Error(
                    FailureRecord::new(message.unwrap_or_default())
                        .with_name(name)
                        .with_stack(read_file(&path)?),
                ),
                None => CommandError::from(message.unwrap_or_default().as_str()),
            };

            let merged = sanitize_error_with(&filter, command_error, &saved)?;
            println!("{}", merged.stack.unwrap_or_default());
            Ok(0)
        }
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))
}

fn print_summary(summary: &ReplaySummary) {
    use colored::Colorize;

    println!();
    if summary.passed() {
        println!("{} {}", "PASSED".green().bold(), summary.name);
    } else {
        println!(
            "{} {} ({} failed)",
            "FAILED".red().bold(),
            summary.name,
            summary.failed
        );
    }
    if summary.unclosed_suites > 0 {
        println!(
            "{}",
            format!("{} suite(s) never finished", summary.unclosed_suites).yellow()
        );
    }
}
