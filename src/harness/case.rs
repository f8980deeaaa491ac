//! Single assertions and the rules for evaluating them.

use std::io;
use std::rc::Rc;

use serde::Serialize;
use termcolor::WriteColor;
use tracing::{debug, trace};

use crate::diagnostics::{EvalError, FailureKind};
use crate::harness::report::{self, CaseReport, ReportStyle};
use crate::harness::{HarnessConfig, Status};
use crate::runtime::{eval_shared, exec_shared, EvalOptions, SharedScope};

/// What a case evaluates. Each variant carries only the fields its rule needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseSpec {
    /// Passes when the expression evaluates to a truthy value.
    Plain { expr: String },
    /// Runs every line but the last as a statement, then asserts the last line.
    Sequence { lines: Vec<String> },
    /// Passes when the expression raises `kind`, with exactly `message` if given.
    ExpectError {
        expr: String,
        kind: FailureKind,
        message: Option<String>,
    },
}

/// Identity used to deduplicate cases within a suite: the variant plus its content.
///
/// The expected kind and message of an error case are not part of its identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseKey<'a> {
    Plain(&'a str),
    Sequence(&'a [String]),
    ExpectError(&'a str),
}

impl CaseSpec {
    pub fn key(&self) -> CaseKey<'_> {
        match self {
            CaseSpec::Plain { expr } => CaseKey::Plain(expr),
            CaseSpec::Sequence { lines } => CaseKey::Sequence(lines),
            CaseSpec::ExpectError { expr, .. } => CaseKey::ExpectError(expr),
        }
    }

    /// Rendering of the content used when no description is given.
    pub fn default_description(&self) -> String {
        match self {
            CaseSpec::Plain { expr } => expr.clone(),
            CaseSpec::Sequence { lines } => lines.join("; "),
            CaseSpec::ExpectError {
                expr,
                kind,
                message: None,
            } => format!("{} raises {}", expr, kind),
            CaseSpec::ExpectError {
                expr,
                kind,
                message: Some(message),
            } => format!("{} raises {}: {}", expr, kind, message),
        }
    }
}

/// Kind and message recorded for a failed case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&EvalError> for Failure {
    fn from(error: &EvalError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    #[default]
    Pending,
    Passed,
    Failed(Failure),
}

impl Outcome {
    fn failed(kind: FailureKind, message: impl Into<String>) -> Self {
        Outcome::Failed(Failure {
            kind,
            message: message.into(),
        })
    }

    pub fn status(&self) -> Status {
        match self {
            Outcome::Pending => Status::Pending,
            Outcome::Passed => Status::Passed,
            Outcome::Failed(_) => Status::Failed,
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Outcome::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

impl From<&EvalError> for Outcome {
    fn from(error: &EvalError) -> Self {
        Outcome::Failed(Failure::from(error))
    }
}

// ============================================================================
// CASE
// ============================================================================

#[derive(Debug)]
pub struct Case {
    spec: CaseSpec,
    description: String,
    outcome: Outcome,
    scope: SharedScope,
    config: Rc<HarnessConfig>,
}

impl Case {
    pub fn new(spec: CaseSpec, scope: SharedScope) -> Self {
        Self::with_config(spec, None, scope, Rc::new(HarnessConfig::default()))
    }

    pub fn with_config(
        spec: CaseSpec,
        description: Option<&str>,
        scope: SharedScope,
        config: Rc<HarnessConfig>,
    ) -> Self {
        let description = description
            .map(str::to_string)
            .unwrap_or_else(|| spec.default_description());
        Self {
            spec,
            description,
            outcome: Outcome::Pending,
            scope,
            config,
        }
    }

    pub fn spec(&self) -> &CaseSpec {
        &self.spec
    }

    pub fn key(&self) -> CaseKey<'_> {
        self.spec.key()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn passed(&self) -> bool {
        self.outcome.is_passed()
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub(crate) fn attach_scope(&mut self, scope: SharedScope) {
        self.scope = scope;
    }

    /// Resets the outcome, evaluates against the scope, and records the new outcome.
    ///
    /// Failures never escape: they are recorded on the case. Returns whether the case passed.
    pub fn evaluate(&mut self) -> bool {
        self.outcome = Outcome::Pending;
        let outcome = evaluate_spec(&self.spec, &self.scope, &self.config.eval);
        match &outcome {
            Outcome::Failed(failure) => debug!(
                case = %self.description,
                kind = %failure.kind,
                message = %failure.message,
                "case failed"
            ),
            _ => debug!(case = %self.description, "case passed"),
        }
        self.outcome = outcome;
        self.passed()
    }

    /// Writes the single result line for this case.
    pub fn write_report(
        &self,
        out: &mut dyn WriteColor,
        style: &ReportStyle,
        indent: &str,
    ) -> io::Result<()> {
        report::write_status_line(out, style, self.outcome.status(), indent, &self.description)?;
        if let Outcome::Failed(failure) = &self.outcome {
            report::write_failure_detail(out, failure.kind.as_str(), &failure.message)?;
        }
        writeln!(out)
    }

    pub fn print_report(&self, indent: &str) -> io::Result<()> {
        let mut stdout = report::stdout_stream(self.config.color);
        self.write_report(&mut stdout, &self.config.style, indent)
    }

    /// Evaluates, then prints the result line.
    pub fn run(&mut self, indent: &str) -> io::Result<bool> {
        let passed = self.evaluate();
        self.print_report(indent)?;
        Ok(passed)
    }

    pub fn report(&self) -> CaseReport {
        CaseReport {
            description: self.description.clone(),
            outcome: self.outcome.clone(),
        }
    }
}

// ============================================================================
// EVALUATION RULES
// ============================================================================

fn evaluate_spec(spec: &CaseSpec, scope: &SharedScope, options: &EvalOptions) -> Outcome {
    match spec {
        CaseSpec::Plain { expr } => assert_expression(expr, scope, options),
        CaseSpec::Sequence { lines } => run_sequence(lines, scope, options),
        CaseSpec::ExpectError {
            expr,
            kind,
            message,
        } => expect_error(expr, *kind, message.as_deref(), scope, options),
    }
}

fn assert_expression(expr: &str, scope: &SharedScope, options: &EvalOptions) -> Outcome {
    match eval_shared(scope, expr, options) {
        Ok(value) if value.is_truthy() => Outcome::Passed,
        Ok(value) => Outcome::failed(
            FailureKind::AssertionFailed,
            format!("'{}' evaluated to {}", expr, value),
        ),
        Err(error) => Outcome::from(&error),
    }
}

fn run_sequence(lines: &[String], scope: &SharedScope, options: &EvalOptions) -> Outcome {
    let Some((last, statements)) = lines.split_last() else {
        return Outcome::failed(
            FailureKind::AssertionFailed,
            "sequence has no expression to assert",
        );
    };
    for line in statements {
        trace!(%line, "executing statement");
        if let Err(error) = exec_shared(scope, line, options) {
            return Outcome::from(&error);
        }
    }
    assert_expression(last, scope, options)
}

fn expect_error(
    expr: &str,
    kind: FailureKind,
    message: Option<&str>,
    scope: &SharedScope,
    options: &EvalOptions,
) -> Outcome {
    let expected = match message {
        Some(message) => format!("{}: {}", kind, message),
        None => kind.to_string(),
    };
    match eval_shared(scope, expr, options) {
        Ok(value) => Outcome::failed(
            FailureKind::ExpectedErrorMismatch,
            format!("expected {}, but nothing was raised (got {})", expected, value),
        ),
        Err(error) => {
            let raised = Failure::from(&error);
            let kind_matches = raised.kind == kind;
            let message_matches = message.map_or(true, |m| m == raised.message);
            if kind_matches && message_matches {
                Outcome::Passed
            } else {
                Outcome::failed(
                    FailureKind::ExpectedErrorMismatch,
                    format!(
                        "expected {}, got {}: {}",
                        expected, raised.kind, raised.message
                    ),
                )
            }
        }
    }
}
