//! Defines the command-line arguments and subcommands for the Verity CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "verity",
    version,
    about = "Evaluate expression-based test suites against a shared scope."
)]
pub struct VerityArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run every suite in a YAML plan file and print the report.
    Run {
        /// The path to the plan file.
        #[arg(required = true)]
        file: PathBuf,
        /// Report format.
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
        /// Use ASCII glyphs instead of emoji.
        #[arg(long)]
        ascii: bool,
        /// When to color text output.
        #[arg(long, value_enum, default_value_t = ColorArg::Auto)]
        color: ColorArg,
        /// Deepest permitted nesting of function calls.
        #[arg(long)]
        max_depth: Option<usize>,
    },
    /// List the failure kinds an expected-error case can name.
    Kinds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorArg {
    Auto,
    Always,
    Never,
}

impl From<ColorArg> for termcolor::ColorChoice {
    fn from(color: ColorArg) -> Self {
        match color {
            ColorArg::Auto => termcolor::ColorChoice::Auto,
            ColorArg::Always => termcolor::ColorChoice::Always,
            ColorArg::Never => termcolor::ColorChoice::Never,
        }
    }
}
