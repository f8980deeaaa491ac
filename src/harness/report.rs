//! Handles all report output for cases, suites and runners.
//!
//! Text reports are written to any [`WriteColor`] sink so callers can target a
//! terminal, a `termcolor::Buffer`, or anything else. The serializable
//! [`RunReport`] snapshot backs machine-readable output.

use std::io;

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::harness::{Outcome, Status};

// ============================================================================
// STYLE
// ============================================================================

/// Glyphs and indentation used by text reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportStyle {
    pub pass_glyph: String,
    pub fail_glyph: String,
    pub pending_glyph: String,
    pub all_passed_mark: String,
    pub some_failed_mark: String,
    pub indent: String,
}

impl ReportStyle {
    pub fn emoji() -> Self {
        Self {
            pass_glyph: "✔️".to_string(),
            fail_glyph: "❌".to_string(),
            pending_glyph: "⏳".to_string(),
            all_passed_mark: "🚀".to_string(),
            some_failed_mark: "⚠️".to_string(),
            indent: "    ".to_string(),
        }
    }

    pub fn ascii() -> Self {
        Self {
            pass_glyph: "[PASS]".to_string(),
            fail_glyph: "[FAIL]".to_string(),
            pending_glyph: "[....]".to_string(),
            all_passed_mark: "**".to_string(),
            some_failed_mark: "!!".to_string(),
            indent: "    ".to_string(),
        }
    }

    pub fn glyph(&self, status: Status) -> &str {
        match status {
            Status::Passed => &self.pass_glyph,
            Status::Failed => &self.fail_glyph,
            Status::Pending => &self.pending_glyph,
        }
    }
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self::emoji()
    }
}

// ============================================================================
// SNAPSHOTS
// ============================================================================

/// Suite counts produced by [`Runner::evaluate`](crate::harness::Runner::evaluate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub passing: usize,
    pub failing: usize,
}

impl RunSummary {
    pub fn all_passed(&self) -> bool {
        self.failing == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseReport {
    pub description: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteReport {
    pub name: String,
    pub status: Status,
    pub cases: Vec<CaseReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub suites: Vec<SuiteReport>,
    pub summary: RunSummary,
}

// ============================================================================
// WRITERS
// ============================================================================

/// Opens stdout, resolving `Auto` against whether stdout is a terminal.
pub fn stdout_stream(choice: ColorChoice) -> StandardStream {
    let choice = match choice {
        ColorChoice::Auto if !atty::is(atty::Stream::Stdout) => ColorChoice::Never,
        other => other,
    };
    StandardStream::stdout(choice)
}

fn status_color(status: Status) -> Color {
    match status {
        Status::Passed => Color::Green,
        Status::Failed => Color::Red,
        Status::Pending => Color::Yellow,
    }
}

/// Writes `<indent><glyph> <text>` without a trailing newline.
pub(crate) fn write_status_line(
    out: &mut dyn WriteColor,
    style: &ReportStyle,
    status: Status,
    indent: &str,
    text: &str,
) -> io::Result<()> {
    write!(out, "{}", indent)?;
    out.set_color(ColorSpec::new().set_fg(Some(status_color(status))).set_bold(true))?;
    write!(out, "{}", style.glyph(status))?;
    out.reset()?;
    write!(out, " {}", text)
}

/// Writes `  =>  <Kind>: <message>` in red.
pub(crate) fn write_failure_detail(
    out: &mut dyn WriteColor,
    kind: &str,
    message: &str,
) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
    write!(out, "  =>  {}: {}", kind, message)?;
    out.reset()
}

/// Two blank lines, then either the celebratory line or the failure counts.
pub(crate) fn write_summary(
    out: &mut dyn WriteColor,
    style: &ReportStyle,
    summary: &RunSummary,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out)?;
    if summary.all_passed() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        writeln!(out, "{} All {} tests passed!", style.all_passed_mark, summary.total)?;
        return out.reset();
    }
    out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
    writeln!(out, "{} Some test failed!", style.some_failed_mark)?;
    out.reset()?;
    writeln!(out, "{}{} passing", style.indent, summary.passing)?;
    writeln!(out, "{}{} failing", style.indent, summary.failing)
}
