//! The Verity Command-Line Interface.
//!
//! Parses arguments, installs logging, and dispatches to the subcommand handlers.

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::args::{Command, Format, VerityArgs};
use crate::diagnostics::FailureKind;
use crate::harness::{HarnessConfig, ReportStyle};
use crate::plan::Plan;

pub mod args;

/// Exit code for a run where at least one suite failed.
const EXIT_FAILURES: u8 = 1;
/// Exit code for an unreadable plan, a bad setup statement, or an I/O error.
const EXIT_ERROR: u8 = 2;

/// The main entry point for the CLI.
pub fn run() -> ExitCode {
    init_logging();
    let args = VerityArgs::parse();

    match args.command {
        Command::Run {
            file,
            format,
            ascii,
            color,
            max_depth,
        } => {
            let mut config = HarnessConfig::default().with_color(color.into());
            if ascii {
                config = config.with_style(ReportStyle::ascii());
            }
            if let Some(max_depth) = max_depth {
                config = config.with_max_depth(max_depth);
            }
            handle_run(&file, format, config)
        }
        Command::Kinds => handle_kinds(),
    }
}

/// Logs go to stderr so they never interleave with the report on stdout.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Handles the `run` subcommand.
fn handle_run(path: &Path, format: Format, config: HarnessConfig) -> ExitCode {
    let runner = Plan::load(path).and_then(|plan| plan.build_runner(config));
    let mut runner = match runner {
        Ok(runner) => runner,
        Err(error) => {
            eprintln!("{:?}", miette::Report::new(error));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let summary = runner.evaluate();
    let written = match format {
        Format::Text => runner.print_report(),
        Format::Json => write_json(&runner.report()),
    };
    if let Err(error) = written {
        eprintln!("Error: failed to write report: {}", error);
        return ExitCode::from(EXIT_ERROR);
    }

    if summary.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_FAILURES)
    }
}

fn write_json<T: serde::Serialize>(report: &T) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, report)?;
    writeln!(stdout)
}

/// Handles the `kinds` subcommand.
fn handle_kinds() -> ExitCode {
    for kind in FailureKind::ALL {
        let origin = if kind.is_synthesized() {
            "harness"
        } else {
            "evaluation"
        };
        println!("{:<24} {}", kind.as_str(), origin);
    }
    ExitCode::SUCCESS
}
