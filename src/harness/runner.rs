use std::io;
use std::rc::Rc;

use termcolor::WriteColor;
use tracing::info;

use crate::harness::report::{self, RunReport, RunSummary};
use crate::harness::{HarnessConfig, Status, Suite};
use crate::runtime::{Scope, SharedScope};

/// Top-level owner of the scope and the ordered suites of one test session.
#[derive(Debug)]
pub struct Runner {
    suites: Vec<Suite>,
    scope: SharedScope,
    config: Rc<HarnessConfig>,
    summary: RunSummary,
    status: Status,
}

impl Runner {
    /// A runner with default configuration and a fresh scope holding the builtins.
    pub fn new() -> Self {
        Self::with_config(HarnessConfig::default())
    }

    pub fn with_config(config: HarnessConfig) -> Self {
        Self {
            suites: Vec::new(),
            scope: Scope::new().into_shared(),
            config: Rc::new(config),
            summary: RunSummary::default(),
            status: Status::Pending,
        }
    }

    /// Replaces the scope, for this runner and every suite and case it already holds.
    pub fn attach_scope(&mut self, scope: SharedScope) {
        for suite in &mut self.suites {
            suite.attach_scope(Rc::clone(&scope));
        }
        self.scope = scope;
    }

    pub fn scope(&self) -> &SharedScope {
        &self.scope
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Returns the suite named `name`, creating it with this runner's scope on first request.
    pub fn get_or_create_suite(&mut self, name: &str) -> &mut Suite {
        let index = match self.suites.iter().position(|suite| suite.name() == name) {
            Some(index) => index,
            None => {
                let suite =
                    Suite::with_config(name, Rc::clone(&self.scope), Rc::clone(&self.config));
                self.suites.push(suite);
                self.suites.len() - 1
            }
        };
        &mut self.suites[index]
    }

    pub fn suite(&self, name: &str) -> Option<&Suite> {
        self.suites.iter().find(|suite| suite.name() == name)
    }

    pub fn suites(&self) -> &[Suite] {
        &self.suites
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Evaluates every suite in order and recomputes the counts.
    pub fn evaluate(&mut self) -> RunSummary {
        let mut passing = 0;
        for suite in &mut self.suites {
            if suite.evaluate() {
                passing += 1;
            }
        }
        let total = self.suites.len();
        self.summary = RunSummary {
            total,
            passing,
            failing: total - passing,
        };
        self.status = Status::from_passed(self.summary.all_passed());
        info!(
            total,
            passing,
            failing = self.summary.failing,
            "run evaluated"
        );
        self.summary
    }

    /// Writes every suite report, then the summary.
    ///
    /// Before the first [`evaluate`](Self::evaluate) there are no counts, so only the
    /// pending suites are written.
    pub fn write_report(&self, out: &mut dyn WriteColor) -> io::Result<()> {
        for suite in &self.suites {
            suite.write_report(out)?;
        }
        if self.status == Status::Pending {
            return Ok(());
        }
        report::write_summary(out, &self.config.style, &self.summary)
    }

    pub fn print_report(&self) -> io::Result<()> {
        let mut stdout = report::stdout_stream(self.config.color);
        self.write_report(&mut stdout)
    }

    /// Evaluates, then prints the full report.
    pub fn run(&mut self) -> io::Result<RunSummary> {
        let summary = self.evaluate();
        self.print_report()?;
        Ok(summary)
    }

    pub fn report(&self) -> RunReport {
        RunReport {
            suites: self.suites.iter().map(Suite::report).collect(),
            summary: self.summary,
        }
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}
