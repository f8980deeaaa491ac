//! Evaluation of parsed case lines against a [`Scope`].
//!
//! ## Name resolution
//!
//! A lambda call binds its parameters in a fresh local frame. Lookups check the
//! innermost frame first and then fall back to the scope; frames of enclosing calls
//! are not visible, so lambdas do not capture locals.
//!
//! ## Mutation
//!
//! Only statement-level assignment writes to the scope. Expression evaluation never
//! mutates it, which is why [`eval_expr`] takes a shared reference.

use std::collections::HashMap;
use std::rc::Rc;

use tracing::trace;

use crate::ast::{Expr, Lambda, LogicalOp, Stmt, UnaryOp, Value};
use crate::diagnostics::EvalError;
use crate::runtime::ops;
use crate::runtime::scope::Scope;

pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Limits applied to a single evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalOptions {
    /// Deepest permitted nesting of function calls.
    pub max_depth: usize,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Executes a statement. Assignments bind into the scope and yield the bound value.
pub fn exec_stmt(stmt: &Stmt, scope: &mut Scope, options: &EvalOptions) -> Result<Value, EvalError> {
    match stmt {
        Stmt::Assign { name, value } => {
            let value = eval_expr(value, scope, options)?;
            trace!(%name, %value, "binding");
            scope.bind(name.clone(), value.clone());
            Ok(value)
        }
        Stmt::Expr(expr) => eval_expr(expr, scope, options),
    }
}

pub fn eval_expr(expr: &Expr, scope: &Scope, options: &EvalOptions) -> Result<Value, EvalError> {
    let mut evaluator = Evaluator {
        scope,
        options,
        frames: Vec::new(),
    };
    evaluator.eval(expr)
}

// ============================================================================
// EVALUATOR
// ============================================================================

struct Evaluator<'a> {
    scope: &'a Scope,
    options: &'a EvalOptions,
    frames: Vec<HashMap<String, Value>>,
}

impl Evaluator<'_> {
    fn eval(&mut self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::Nil => Ok(Value::Nil),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Int(n) => Ok(Value::Int(*n)),
            Expr::Float(x) => Ok(Value::Float(*x)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::List(items) => {
                let values = items
                    .iter()
                    .map(|item| self.eval(item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::List(values))
            }
            Expr::Name(name) => self.lookup(name),
            Expr::Unary { op, operand } => {
                let value = self.eval(operand)?;
                match op {
                    UnaryOp::Neg => ops::negate(&value),
                    UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
                }
            }
            Expr::Binary { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                ops::binary(*op, &left, &right)
            }
            Expr::Logical { op, left, right } => {
                let left = self.eval(left)?;
                match (op, left.is_truthy()) {
                    (LogicalOp::And, false) | (LogicalOp::Or, true) => Ok(left),
                    _ => self.eval(right),
                }
            }
            Expr::Call { callee, args } => {
                let callee = self.eval(callee)?;
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                self.call(&callee, &args)
            }
            Expr::Index { target, index } => {
                let target = self.eval(target)?;
                let index = self.eval(index)?;
                ops::index(&target, &index)
            }
            Expr::Lambda { params, body } => Ok(Value::Lambda(Rc::new(Lambda {
                params: params.clone(),
                body: Rc::clone(body),
            }))),
        }
    }

    fn lookup(&self, name: &str) -> Result<Value, EvalError> {
        if let Some(value) = self.frames.last().and_then(|frame| frame.get(name)) {
            return Ok(value.clone());
        }
        self.scope
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UndefinedName {
                name: name.to_string(),
            })
    }

    fn call(&mut self, callee: &Value, args: &[Value]) -> Result<Value, EvalError> {
        match callee {
            Value::Native(native) => native.call(args),
            Value::Lambda(lambda) => self.call_lambda(lambda, args),
            other => Err(EvalError::NotCallable {
                type_name: other.type_name(),
            }),
        }
    }

    fn call_lambda(&mut self, lambda: &Lambda, args: &[Value]) -> Result<Value, EvalError> {
        if lambda.params.len() != args.len() {
            return Err(EvalError::ArityMismatch {
                callee: format!("fn({})", lambda.params.join(", ")),
                expected: lambda.params.len().to_string(),
                actual: args.len(),
            });
        }
        if self.frames.len() >= self.options.max_depth {
            return Err(EvalError::RecursionLimit {
                limit: self.options.max_depth,
            });
        }

        let frame = lambda
            .params
            .iter()
            .cloned()
            .zip(args.iter().cloned())
            .collect();
        self.frames.push(frame);
        let result = self.eval(&lambda.body);
        self.frames.pop();
        result
    }
}
