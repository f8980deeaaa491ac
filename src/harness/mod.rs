//! The assertion harness: cases grouped into suites grouped under a runner.
//!
//! # Architecture
//!
//! - [`Case`]: one assertion (plain expression, statement sequence, or expected
//!   error) plus its [`Outcome`].
//! - [`Suite`]: named, ordered, deduplicated cases; passes iff every case passes.
//! - [`Runner`]: named, ordered, deduplicated suites; owns the [`SharedScope`]
//!   handed to every suite and case, and produces the run summary.
//!
//! Evaluation is strictly sequential in insertion order, so a case can rely on
//! bindings made by any case evaluated before it.
//!
//! # Example
//!
//! ```rust
//! use verity::harness::Runner;
//!
//! let mut runner = Runner::new();
//! runner.scope().borrow_mut().bind("x", 42i64);
//!
//! let suite = runner.get_or_create_suite("Question 1");
//! suite.get_or_create_case("x == 42", None);
//! suite.get_or_create_case("z == 42", None);
//!
//! let summary = runner.evaluate();
//! assert_eq!(summary.failing, 1);
//! ```
//!
//! [`SharedScope`]: crate::runtime::SharedScope

use serde::Serialize;

pub mod case;
pub mod config;
pub mod report;
pub mod runner;
pub mod suite;

pub use case::{Case, CaseKey, CaseSpec, Failure, Outcome};
pub use config::HarnessConfig;
pub use report::{CaseReport, ReportStyle, RunReport, RunSummary, SuiteReport};
pub use runner::Runner;
pub use suite::Suite;

/// Evaluation state shared by cases, suites and runners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Pending,
    Passed,
    Failed,
}

impl Status {
    pub fn from_passed(passed: bool) -> Self {
        if passed {
            Status::Passed
        } else {
            Status::Failed
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Status::Passed)
    }
}
