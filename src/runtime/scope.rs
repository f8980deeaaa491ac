use std::cell::RefCell;
use std::rc::Rc;

use im::HashMap;
use tracing::trace;

use crate::ast::{Arity, NativeFn, Stmt, Value};
use crate::builtins;
use crate::diagnostics::EvalError;
use crate::runtime::eval::{eval_expr, exec_stmt, EvalOptions};
use crate::syntax::{parse_expression, parse_statement};

/// A scope shared by one runner and every suite and case it creates.
pub type SharedScope = Rc<RefCell<Scope>>;

// ============================================================================
// SCOPE: the named-value environment every case evaluates against
// ============================================================================

/// Mapping from names to values that cases read and mutate.
///
/// A fresh [`Scope::new`] comes with the builtin functions bound; client code adds
/// its own variables and functions before cases run.
#[derive(Debug, Clone)]
pub struct Scope {
    bindings: HashMap<String, Value>,
}

impl Scope {
    /// A scope with the builtins bound.
    pub fn new() -> Self {
        let mut scope = Self::empty();
        builtins::register_builtins(&mut scope);
        scope
    }

    /// A scope with nothing bound, not even the builtins.
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    pub fn into_shared(self) -> SharedScope {
        Rc::new(RefCell::new(self))
    }

    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.bindings.insert(name.into(), value.into())
    }

    /// Binds a Rust closure callable from case expressions.
    pub fn bind_native<F>(&mut self, name: &str, arity: Arity, body: F) -> Option<Value>
    where
        F: Fn(&[Value]) -> Result<Value, EvalError> + 'static,
    {
        let native = NativeFn::new(name, arity, body);
        self.bindings
            .insert(name.to_string(), Value::Native(Rc::new(native)))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.bindings.remove(name)
    }

    /// Bound names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.bindings.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Parses and executes one statement with default options.
    pub fn exec(&mut self, statement: &str) -> Result<Value, EvalError> {
        self.exec_with(statement, &EvalOptions::default())
    }

    pub fn exec_with(&mut self, statement: &str, options: &EvalOptions) -> Result<Value, EvalError> {
        let stmt: Stmt = parse_statement(statement)?;
        exec_stmt(&stmt, self, options)
    }

    /// Parses and evaluates one expression with default options.
    pub fn eval(&self, expression: &str) -> Result<Value, EvalError> {
        self.eval_with(expression, &EvalOptions::default())
    }

    pub fn eval_with(&self, expression: &str, options: &EvalOptions) -> Result<Value, EvalError> {
        let expr = parse_expression(expression)?;
        eval_expr(&expr, self, options)
    }
}

// ============================================================================
// SHARED SCOPE: evaluation without holding a borrow
// ============================================================================

/// Executes one statement against a shared scope.
///
/// Evaluation runs on a snapshot, so native functions may borrow the shared scope
/// (mutably, even) while they run. An assignment is written back once its value is
/// known. Bindings made by natives during evaluation are kept.
pub fn exec_shared(
    scope: &SharedScope,
    statement: &str,
    options: &EvalOptions,
) -> Result<Value, EvalError> {
    match parse_statement(statement)? {
        Stmt::Assign { name, value } => {
            let snapshot = scope.borrow().clone();
            let value = eval_expr(&value, &snapshot, options)?;
            trace!(%name, %value, "binding");
            scope.borrow_mut().bind(name, value.clone());
            Ok(value)
        }
        Stmt::Expr(expr) => {
            let snapshot = scope.borrow().clone();
            eval_expr(&expr, &snapshot, options)
        }
    }
}

/// Evaluates one expression against a snapshot of a shared scope.
pub fn eval_shared(
    scope: &SharedScope,
    expression: &str,
    options: &EvalOptions,
) -> Result<Value, EvalError> {
    let expr = parse_expression(expression)?;
    let snapshot = scope.borrow().clone();
    eval_expr(&expr, &snapshot, options)
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}
