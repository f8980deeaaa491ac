//! # Numeric builtins
//!
//! `abs`, `min`, `max` and the `int` / `float` conversions.

use crate::ast::{Arity, Value};
use crate::builtins::BuiltinFn;
use crate::diagnostics::EvalError;
use crate::runtime::Scope;

pub fn register_math_builtins(scope: &mut Scope) {
    scope.bind_native("abs", Arity::Exact(1), BUILTIN_ABS);
    scope.bind_native("min", Arity::AtLeast(1), BUILTIN_MIN);
    scope.bind_native("max", Arity::AtLeast(1), BUILTIN_MAX);
    scope.bind_native("int", Arity::Exact(1), BUILTIN_INT);
    scope.bind_native("float", Arity::Exact(1), BUILTIN_FLOAT);
}

fn expect_number(value: &Value, func_name: &str) -> Result<f64, EvalError> {
    match value {
        Value::Int(_) | Value::Float(_) => Ok(value.as_f64().unwrap_or_default()),
        other => Err(EvalError::type_mismatch(format!(
            "{} expects a number, got {}",
            func_name,
            other.type_name()
        ))),
    }
}

/// `min(a, b, ...)` and `min([a, b, ...])` both work.
fn extremum(args: &[Value], func_name: &str, pick_left: fn(f64, f64) -> bool) -> Result<Value, EvalError> {
    let candidates = match args {
        [Value::List(items)] => items.as_slice(),
        _ => args,
    };
    let Some((first, rest)) = candidates.split_first() else {
        return Err(EvalError::type_mismatch(format!(
            "{} of an empty list",
            func_name
        )));
    };

    let mut best = first;
    let mut best_value = expect_number(first, func_name)?;
    for candidate in rest {
        let value = expect_number(candidate, func_name)?;
        if pick_left(value, best_value) {
            best = candidate;
            best_value = value;
        }
    }
    Ok(best.clone())
}

/// Absolute value, keeping ints as ints.
///
/// Example:
///   abs(-3) == 3
pub const BUILTIN_ABS: BuiltinFn = |args| match &args[0] {
    Value::Int(n) => n
        .checked_abs()
        .map(Value::Int)
        .ok_or(EvalError::Overflow { op: "abs" }),
    Value::Float(x) => Ok(Value::Float(x.abs())),
    other => Err(EvalError::type_mismatch(format!(
        "abs expects a number, got {}",
        other.type_name()
    ))),
};

pub const BUILTIN_MIN: BuiltinFn = |args| extremum(args, "min", |a, b| a < b);

pub const BUILTIN_MAX: BuiltinFn = |args| extremum(args, "max", |a, b| a > b);

/// Truncates floats toward zero and parses decimal strings.
///
/// Example:
///   int("42") == 42
pub const BUILTIN_INT: BuiltinFn = |args| match &args[0] {
    Value::Int(n) => Ok(Value::Int(*n)),
    Value::Float(x) if x.is_finite() && x.abs() < i64::MAX as f64 => Ok(Value::Int(x.trunc() as i64)),
    Value::Float(_) => Err(EvalError::Overflow { op: "int" }),
    Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
    Value::Str(s) => s.trim().parse::<i64>().map(Value::Int).map_err(|_| {
        EvalError::type_mismatch(format!("invalid literal for int: '{}'", s))
    }),
    other => Err(EvalError::type_mismatch(format!(
        "int expects a number or string, got {}",
        other.type_name()
    ))),
};

pub const BUILTIN_FLOAT: BuiltinFn = |args| match &args[0] {
    Value::Int(n) => Ok(Value::Float(*n as f64)),
    Value::Float(x) => Ok(Value::Float(*x)),
    Value::Str(s) => s.trim().parse::<f64>().map(Value::Float).map_err(|_| {
        EvalError::type_mismatch(format!("invalid literal for float: '{}'", s))
    }),
    other => Err(EvalError::type_mismatch(format!(
        "float expects a number or string, got {}",
        other.type_name()
    ))),
};
