//! YAML plan files: setup statements plus the suites and cases to run.
//!
//! ```yaml
//! setup:
//!   - "x = 42"
//!   - "addition = fn(a, b) => a + b"
//! suites:
//!   - name: "Question 1"
//!     cases:
//!       - expr: "x == 42"
//!       - lines: ["y = x + 1", "y == 43"]
//!         description: "y follows x"
//!       - expr: "1 / 0"
//!         raises: DivisionByZero
//!         message: "division by zero"   # optional
//! ```

use std::fs;
use std::path::Path;

use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::diagnostics::{EvalError, FailureKind};
use crate::harness::{HarnessConfig, Runner};
use crate::runtime::exec_shared;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Plan {
    /// Statements executed into the scope before any suite is created.
    #[serde(default)]
    pub setup: Vec<String>,
    #[serde(default)]
    pub suites: Vec<SuitePlan>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuitePlan {
    pub name: String,
    #[serde(default)]
    pub cases: Vec<CasePlan>,
}

/// One case entry, picked by which keys are present:
/// `expr` alone, `lines`, or `expr` with `raises`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawCase")]
pub enum CasePlan {
    ExpectError {
        expr: String,
        raises: FailureKind,
        message: Option<String>,
    },
    Sequence {
        lines: Vec<String>,
        description: Option<String>,
    },
    Plain {
        expr: String,
        description: Option<String>,
    },
}

/// Every key a case entry may carry. Combinations are checked in `TryFrom`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCase {
    expr: Option<String>,
    lines: Option<Vec<String>>,
    raises: Option<FailureKind>,
    message: Option<String>,
    description: Option<String>,
}

impl TryFrom<RawCase> for CasePlan {
    type Error = String;

    fn try_from(raw: RawCase) -> Result<Self, Self::Error> {
        match raw {
            RawCase {
                expr: Some(_),
                lines: Some(_),
                ..
            } => Err("a case takes either `expr` or `lines`, not both".to_string()),
            RawCase {
                expr: Some(expr),
                raises: Some(raises),
                message,
                description: None,
                lines: None,
            } => Ok(CasePlan::ExpectError {
                expr,
                raises,
                message,
            }),
            RawCase {
                raises: Some(_),
                description: Some(_),
                ..
            } => Err("`description` cannot be combined with `raises`".to_string()),
            RawCase {
                raises: Some(_), ..
            } => Err("`raises` needs an `expr`".to_string()),
            RawCase {
                message: Some(_), ..
            } => Err("`message` is only valid together with `raises`".to_string()),
            RawCase {
                lines: Some(lines),
                description,
                ..
            } => Ok(CasePlan::Sequence { lines, description }),
            RawCase {
                expr: Some(expr),
                description,
                ..
            } => Ok(CasePlan::Plain { expr, description }),
            RawCase { .. } => Err("a case needs `expr` or `lines`".to_string()),
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum PlanError {
    #[error("failed to read plan file '{path}'")]
    #[diagnostic(code(verity::plan::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid plan: {0}")]
    #[diagnostic(
        code(verity::plan::format),
        help("each case needs `expr`, `lines`, or `expr` together with `raises`")
    )]
    Format(#[from] serde_yaml::Error),

    #[error("setup statement `{statement}` failed")]
    #[diagnostic(code(verity::plan::setup))]
    Setup {
        statement: String,
        #[source]
        #[diagnostic_source]
        source: EvalError,
    },
}

impl Plan {
    pub fn load(path: &Path) -> Result<Self, PlanError> {
        let text = fs::read_to_string(path).map_err(|source| PlanError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, PlanError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Runs the setup statements into a fresh scope and registers every suite and case.
    ///
    /// Nothing is evaluated beyond the setup; call [`Runner::evaluate`] or [`Runner::run`].
    pub fn build_runner(&self, config: HarnessConfig) -> Result<Runner, PlanError> {
        let mut runner = Runner::with_config(config);
        let options = runner.config().eval;

        for statement in &self.setup {
            debug!(%statement, "executing setup statement");
            exec_shared(runner.scope(), statement, &options).map_err(|source| PlanError::Setup {
                    statement: statement.clone(),
                    source,
                })?;
        }

        for suite_plan in &self.suites {
            let suite = runner.get_or_create_suite(&suite_plan.name);
            for case in &suite_plan.cases {
                match case {
                    CasePlan::ExpectError {
                        expr,
                        raises,
                        message,
                    } => {
                        suite.get_or_create_error_case(expr, *raises, message.as_deref());
                    }
                    CasePlan::Sequence { lines, description } => {
                        suite.get_or_create_sequence_case(lines.iter().cloned(), description.as_deref());
                    }
                    CasePlan::Plain { expr, description } => {
                        suite.get_or_create_case(expr, description.as_deref());
                    }
                }
            }
        }

        Ok(runner)
    }
}
