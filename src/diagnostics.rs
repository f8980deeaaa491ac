//! Failure taxonomy for the expression language and the harness.
//!
//! Every failure a case can record carries a [`FailureKind`]. Kinds are owned by
//! this crate rather than borrowed from any host runtime, so expected-error cases
//! compare against a fixed, portable set of names.
//!
//! Evaluation failures are [`EvalError`]s: `thiserror` supplies the message,
//! `miette` supplies diagnostic codes and, for syntax errors, the labelled source.

use std::fmt;
use std::str::FromStr;

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed classification of everything that can make a case fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// Source text does not parse as a statement or expression
    SyntaxError,
    /// A name is neither a local parameter nor bound in the scope
    UndefinedName,
    /// Operand or argument types do not fit the operation
    TypeMismatch,
    /// Division, floor division or modulo by zero
    DivisionByZero,
    /// A function was called with the wrong number of arguments
    ArityMismatch,
    /// A call was attempted on a value that is not a function
    NotCallable,
    /// List or string index outside the valid range
    IndexOutOfRange,
    /// Integer arithmetic overflowed
    Overflow,
    /// Nested calls exceeded the configured depth
    RecursionLimit,
    /// Raised explicitly with `fail(message)`
    UserError,
    /// An asserted expression evaluated to a falsy value
    AssertionFailed,
    /// An expected-error case saw the wrong failure, or none at all
    ExpectedErrorMismatch,
}

impl FailureKind {
    pub const ALL: [FailureKind; 12] = [
        FailureKind::SyntaxError,
        FailureKind::UndefinedName,
        FailureKind::TypeMismatch,
        FailureKind::DivisionByZero,
        FailureKind::ArityMismatch,
        FailureKind::NotCallable,
        FailureKind::IndexOutOfRange,
        FailureKind::Overflow,
        FailureKind::RecursionLimit,
        FailureKind::UserError,
        FailureKind::AssertionFailed,
        FailureKind::ExpectedErrorMismatch,
    ];

    /// Returns the name used in reports and plan files.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::SyntaxError => "SyntaxError",
            FailureKind::UndefinedName => "UndefinedName",
            FailureKind::TypeMismatch => "TypeMismatch",
            FailureKind::DivisionByZero => "DivisionByZero",
            FailureKind::ArityMismatch => "ArityMismatch",
            FailureKind::NotCallable => "NotCallable",
            FailureKind::IndexOutOfRange => "IndexOutOfRange",
            FailureKind::Overflow => "Overflow",
            FailureKind::RecursionLimit => "RecursionLimit",
            FailureKind::UserError => "UserError",
            FailureKind::AssertionFailed => "AssertionFailed",
            FailureKind::ExpectedErrorMismatch => "ExpectedErrorMismatch",
        }
    }

    /// True for kinds synthesized by the harness rather than raised by evaluation.
    pub fn is_synthesized(&self) -> bool {
        matches!(
            self,
            FailureKind::AssertionFailed | FailureKind::ExpectedErrorMismatch
        )
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown failure kind '{0}'")]
pub struct UnknownFailureKind(pub String);

impl FromStr for FailureKind {
    type Err = UnknownFailureKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FailureKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownFailureKind(s.to_string()))
    }
}

/// A failure raised while parsing or evaluating a statement.
#[derive(Debug, Error, Diagnostic)]
pub enum EvalError {
    #[error("{message}")]
    #[diagnostic(code(verity::syntax))]
    Syntax {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("name '{name}' is not defined")]
    #[diagnostic(code(verity::eval::undefined_name))]
    UndefinedName { name: String },

    #[error("{message}")]
    #[diagnostic(code(verity::eval::type_mismatch))]
    TypeMismatch { message: String },

    #[error("division by zero")]
    #[diagnostic(code(verity::eval::division_by_zero))]
    DivisionByZero,

    #[error("{callee} expects {expected} argument(s), got {actual}")]
    #[diagnostic(code(verity::eval::arity))]
    ArityMismatch {
        callee: String,
        expected: String,
        actual: usize,
    },

    #[error("'{type_name}' value is not callable")]
    #[diagnostic(code(verity::eval::not_callable))]
    NotCallable { type_name: &'static str },

    #[error("index {index} out of range for length {len}")]
    #[diagnostic(code(verity::eval::index))]
    IndexOutOfRange { index: i64, len: usize },

    #[error("integer overflow in '{op}'")]
    #[diagnostic(code(verity::eval::overflow))]
    Overflow { op: &'static str },

    #[error("maximum call depth of {limit} exceeded")]
    #[diagnostic(
        code(verity::eval::recursion_limit),
        help("raise `max_depth` in the harness configuration if the recursion is intended")
    )]
    RecursionLimit { limit: usize },

    #[error("{message}")]
    #[diagnostic(code(verity::eval::user))]
    User { message: String },
}

impl EvalError {
    pub fn kind(&self) -> FailureKind {
        match self {
            EvalError::Syntax { .. } => FailureKind::SyntaxError,
            EvalError::UndefinedName { .. } => FailureKind::UndefinedName,
            EvalError::TypeMismatch { .. } => FailureKind::TypeMismatch,
            EvalError::DivisionByZero => FailureKind::DivisionByZero,
            EvalError::ArityMismatch { .. } => FailureKind::ArityMismatch,
            EvalError::NotCallable { .. } => FailureKind::NotCallable,
            EvalError::IndexOutOfRange { .. } => FailureKind::IndexOutOfRange,
            EvalError::Overflow { .. } => FailureKind::Overflow,
            EvalError::RecursionLimit { .. } => FailureKind::RecursionLimit,
            EvalError::User { .. } => FailureKind::UserError,
        }
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        EvalError::TypeMismatch {
            message: message.into(),
        }
    }

    pub fn syntax(message: impl Into<String>, source: &str, span: (usize, usize)) -> Self {
        let (start, end) = span;
        EvalError::Syntax {
            message: message.into(),
            src: NamedSource::new("<case>", source.to_string()),
            span: (start, end.saturating_sub(start)).into(),
        }
    }
}
