//! Runtime: the shared scope and the evaluator that runs case lines against it.

pub mod eval;
pub mod ops;
pub mod scope;

pub use eval::{eval_expr, exec_stmt, EvalOptions, DEFAULT_MAX_DEPTH};
pub use scope::{eval_shared, exec_shared, Scope, SharedScope};
