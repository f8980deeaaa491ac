//! # Shared test helpers
//!
//! Scope builders mirroring the classic demonstration, plus report capture.

#![allow(dead_code)]

use termcolor::Buffer;
use tracing_subscriber::EnvFilter;
use verity::ast::{Arity, Value};
use verity::harness::{Runner, Suite};
use verity::runtime::{Scope, SharedScope};

/// Initialize tracing controlled by `RUST_LOG`. Only the first call takes effect.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// `{x: 42, addition: (a, b) -> a + b}` on top of the builtins.
pub fn demo_scope() -> SharedScope {
    init_tracing();
    let mut scope = Scope::new();
    scope.bind("x", 42i64);
    scope.bind_native("addition", Arity::Exact(2), |args| {
        match (&args[0], &args[1]) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a + b)),
            _ => Err(verity::EvalError::type_mismatch("addition expects ints")),
        }
    });
    scope.into_shared()
}

pub fn demo_runner() -> Runner {
    let mut runner = Runner::new();
    runner.attach_scope(demo_scope());
    runner
}

pub fn render_suite(suite: &Suite) -> String {
    let mut buffer = Buffer::no_color();
    suite.write_report(&mut buffer).unwrap();
    String::from_utf8(buffer.into_inner()).unwrap()
}

pub fn render_runner(runner: &Runner) -> String {
    let mut buffer = Buffer::no_color();
    runner.write_report(&mut buffer).unwrap();
    String::from_utf8(buffer.into_inner()).unwrap()
}
