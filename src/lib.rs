pub use crate::diagnostics::{EvalError, FailureKind};
pub use crate::harness::{Case, CaseSpec, HarnessConfig, Outcome, Runner, Suite};
pub use crate::runtime::{Scope, SharedScope};

pub mod ast;
pub mod builtins;
pub mod cli;
pub mod diagnostics;
pub mod harness;
pub mod plan;
pub mod runtime;
pub mod syntax;
