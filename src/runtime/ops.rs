//! Operator semantics for binary and unary expressions.

use crate::ast::{BinaryOp, Value};
use crate::diagnostics::EvalError;

pub fn negate(value: &Value) -> Result<Value, EvalError> {
    match value {
        Value::Int(n) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or(EvalError::Overflow { op: "-" }),
        Value::Float(x) => Ok(Value::Float(-x)),
        other => Err(EvalError::type_mismatch(format!(
            "bad operand type for unary -: {}",
            other.type_name()
        ))),
    }
}

pub fn binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    match op {
        BinaryOp::Eq => Ok(Value::Bool(left == right)),
        BinaryOp::Ne => Ok(Value::Bool(left != right)),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => compare(op, left, right),
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub | BinaryOp::Mul => arithmetic(op, left, right),
        BinaryOp::Div | BinaryOp::FloorDiv | BinaryOp::Mod => divide(op, left, right),
    }
}

pub fn index(target: &Value, index: &Value) -> Result<Value, EvalError> {
    let Value::Int(i) = index else {
        return Err(EvalError::type_mismatch(format!(
            "indices must be int, not {}",
            index.type_name()
        )));
    };
    match target {
        Value::List(items) => {
            let at = resolve_index(*i, items.len())?;
            Ok(items[at].clone())
        }
        Value::Str(s) => {
            let chars: Vec<char> = s.chars().collect();
            let at = resolve_index(*i, chars.len())?;
            Ok(Value::Str(chars[at].to_string()))
        }
        other => Err(EvalError::type_mismatch(format!(
            "'{}' value is not indexable",
            other.type_name()
        ))),
    }
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn unsupported(op: BinaryOp, left: &Value, right: &Value) -> EvalError {
    EvalError::type_mismatch(format!(
        "unsupported operand types for {}: {} and {}",
        op,
        left.type_name(),
        right.type_name()
    ))
}

fn resolve_index(index: i64, len: usize) -> Result<usize, EvalError> {
    let out_of_range = EvalError::IndexOutOfRange { index, len };
    let resolved = if index < 0 {
        (len as i64).checked_add(index)
    } else {
        Some(index)
    };
    match resolved {
        Some(at) if at >= 0 && (at as usize) < len => Ok(at as usize),
        _ => Err(out_of_range),
    }
}

fn compare(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let ordering = match (left, right) {
        (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
        (Value::Str(a), Value::Str(b)) => a.partial_cmp(b),
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => return Err(unsupported(op, left, right)),
        },
    };
    // NaN compares false against everything
    let Some(ordering) = ordering else {
        return Ok(Value::Bool(false));
    };
    let result = match op {
        BinaryOp::Lt => ordering.is_lt(),
        BinaryOp::Le => ordering.is_le(),
        BinaryOp::Gt => ordering.is_gt(),
        _ => ordering.is_ge(),
    };
    Ok(Value::Bool(result))
}

fn add(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{}{}", a, b))),
        (Value::List(a), Value::List(b)) => {
            let mut items = a.clone();
            items.extend(b.iter().cloned());
            Ok(Value::List(items))
        }
        _ => arithmetic(BinaryOp::Add, left, right),
    }
}

fn arithmetic(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    if let (Value::Int(a), Value::Int(b)) = (left, right) {
        let result = match op {
            BinaryOp::Add => a.checked_add(*b),
            BinaryOp::Sub => a.checked_sub(*b),
            _ => a.checked_mul(*b),
        };
        return result
            .map(Value::Int)
            .ok_or(EvalError::Overflow { op: op.symbol() });
    }
    let (Some(a), Some(b)) = (numeric(left), numeric(right)) else {
        return Err(unsupported(op, left, right));
    };
    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        _ => a * b,
    };
    Ok(Value::Float(result))
}

fn divide(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let (Some(a), Some(b)) = (numeric(left), numeric(right)) else {
        return Err(unsupported(op, left, right));
    };
    if b == 0.0 {
        return Err(EvalError::DivisionByZero);
    }

    if let (Value::Int(x), Value::Int(y)) = (left, right) {
        match op {
            BinaryOp::FloorDiv => {
                let quotient = x.checked_div(*y).ok_or(EvalError::Overflow { op: "//" })?;
                let floored = if (x % y != 0) && ((*x < 0) != (*y < 0)) {
                    quotient - 1
                } else {
                    quotient
                };
                return Ok(Value::Int(floored));
            }
            BinaryOp::Mod => {
                let remainder = x.checked_rem(*y).ok_or(EvalError::Overflow { op: "%" })?;
                let adjusted = if remainder != 0 && ((remainder < 0) != (*y < 0)) {
                    remainder + y
                } else {
                    remainder
                };
                return Ok(Value::Int(adjusted));
            }
            _ => {}
        }
    }

    let result = match op {
        BinaryOp::Div => a / b,
        BinaryOp::FloorDiv => (a / b).floor(),
        _ => a - b * (a / b).floor(),
    };
    Ok(Value::Float(result))
}

/// Bools are not numbers here, unlike some dynamic languages.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Int(_) | Value::Float(_) => value.as_f64(),
        _ => None,
    }
}
