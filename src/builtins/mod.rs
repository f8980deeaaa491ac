//! # Builtin Functions
//!
//! Functions bound into every [`Scope::new`](crate::runtime::Scope::new). All of them
//! are pure: they read their arguments and never touch the scope.
//!
//! - **Math**: `abs`, `min`, `max`, `int`, `float`
//! - **Collections**: `len`
//! - **Base**: `str`, `type`, `fail`

use crate::ast::Value;
use crate::diagnostics::EvalError;
use crate::runtime::Scope;

pub mod base;
pub mod collections;
pub mod math;

/// Signature shared by every builtin.
pub type BuiltinFn = fn(args: &[Value]) -> Result<Value, EvalError>;

/// Binds every builtin into `scope`, replacing existing bindings of the same names.
pub fn register_builtins(scope: &mut Scope) {
    math::register_math_builtins(scope);
    collections::register_collection_builtins(scope);
    base::register_base_builtins(scope);
}
