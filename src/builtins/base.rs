//! Conversion, introspection and explicit failure.

use crate::ast::{Arity, Value};
use crate::builtins::BuiltinFn;
use crate::diagnostics::EvalError;
use crate::runtime::Scope;

pub fn register_base_builtins(scope: &mut Scope) {
    scope.bind_native("str", Arity::Exact(1), BUILTIN_STR);
    scope.bind_native("type", Arity::Exact(1), BUILTIN_TYPE);
    scope.bind_native("fail", Arity::Exact(1), BUILTIN_FAIL);
}

pub const BUILTIN_STR: BuiltinFn = |args| Ok(Value::Str(args[0].to_string()));

/// Example:
///   type(1.5) == "float"
pub const BUILTIN_TYPE: BuiltinFn = |args| Ok(Value::Str(args[0].type_name().to_string()));

/// Raises a `UserError` carrying the argument as its message.
///
/// Example:
///   fail("not ready")  =>  UserError: not ready
pub const BUILTIN_FAIL: BuiltinFn = |args| {
    Err(EvalError::User {
        message: args[0].to_string(),
    })
};
