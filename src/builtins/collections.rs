use crate::ast::{Arity, Value};
use crate::builtins::BuiltinFn;
use crate::diagnostics::EvalError;
use crate::runtime::Scope;

pub fn register_collection_builtins(scope: &mut Scope) {
    scope.bind_native("len", Arity::Exact(1), BUILTIN_LEN);
}

/// Number of items in a list, or characters in a string.
pub const BUILTIN_LEN: BuiltinFn = |args| {
    let len = match &args[0] {
        Value::List(items) => items.len(),
        Value::Str(s) => s.chars().count(),
        other => {
            return Err(EvalError::type_mismatch(format!(
                "'{}' value has no len()",
                other.type_name()
            )))
        }
    };
    i64::try_from(len)
        .map(Value::Int)
        .map_err(|_| EvalError::Overflow { op: "len" })
};
