//! Case evaluation: plain, sequence and expected-error rules.

mod common;

use verity::harness::{Case, CaseSpec, Failure, Outcome, Suite};
use verity::{FailureKind, Scope};

use common::demo_scope;

fn failure(case: &Case) -> &Failure {
    case.outcome()
        .failure()
        .unwrap_or_else(|| panic!("expected '{}' to fail", case.description()))
}

// ---
// Plain cases
// ---

#[test]
fn plain_cases_against_demo_scope() {
    let mut suite = Suite::new("Question 1", demo_scope());
    assert!(suite.get_or_create_case("x == 42", None).evaluate());
    assert!(suite.get_or_create_case("x != 43", None).evaluate());

    let missing = suite.get_or_create_case("z == 42", None);
    assert!(!missing.evaluate());
    let failure = failure(missing);
    assert_eq!(failure.kind, FailureKind::UndefinedName);
    assert!(failure.message.contains('z'));
}

#[test]
fn plain_case_calls_scope_function() {
    let mut suite = Suite::new("Question 2", demo_scope());
    let case = suite.get_or_create_case("addition(1, 1) == 2", None);
    assert!(case.evaluate());
    assert_eq!(case.outcome(), &Outcome::Passed);
}

#[test]
fn falsy_result_is_assertion_failure() {
    let mut case = Case::new(
        CaseSpec::Plain {
            expr: "x == 43".to_string(),
        },
        demo_scope(),
    );
    assert!(!case.evaluate());
    let failure = failure(&case);
    assert_eq!(failure.kind, FailureKind::AssertionFailed);
    assert!(failure.message.contains("x == 43"));
}

#[test]
fn syntax_error_is_recorded_not_raised() {
    let mut case = Case::new(
        CaseSpec::Plain {
            expr: "x ==".to_string(),
        },
        demo_scope(),
    );
    assert!(!case.evaluate());
    assert_eq!(failure(&case).kind, FailureKind::SyntaxError);
}

#[test]
fn case_is_pending_until_evaluated() {
    let case = Case::new(
        CaseSpec::Plain {
            expr: "true".to_string(),
        },
        Scope::new().into_shared(),
    );
    assert_eq!(case.outcome(), &Outcome::Pending);
    assert_eq!(case.description(), "true");
}

// ---
// Sequence cases
// ---

#[test]
fn sequence_binds_into_shared_scope() {
    let scope = demo_scope();
    let mut suite = Suite::new("Sequences", scope.clone());
    let case = suite.get_or_create_sequence_case(["x = 5", "x == 5"], None);
    assert!(case.evaluate());
    assert_eq!(case.description(), "x = 5; x == 5");

    assert_eq!(
        scope.borrow().get("x"),
        Some(&verity::ast::Value::Int(5))
    );
    assert!(suite.get_or_create_case("x == 5", None).evaluate());
}

#[test]
fn sequence_stops_at_failing_statement() {
    let scope = demo_scope();
    let mut suite = Suite::new("Sequences", scope.clone());
    let case = suite.get_or_create_sequence_case(
        ["a = 1", "b = 1 / 0", "c = 3", "fail('final line reached')"],
        None,
    );
    assert!(!case.evaluate());
    let failure = failure(case);
    assert_eq!(failure.kind, FailureKind::DivisionByZero);
    assert_eq!(failure.message, "division by zero");

    let scope = scope.borrow();
    assert!(scope.contains("a"));
    assert!(!scope.contains("b"));
    assert!(!scope.contains("c"));
}

#[test]
fn sequence_final_line_is_asserted() {
    let mut suite = Suite::new("Sequences", demo_scope());
    let case = suite.get_or_create_sequence_case(["y = 0", "y"], Some("zero is falsy"));
    assert!(!case.evaluate());
    assert_eq!(failure(case).kind, FailureKind::AssertionFailed);
    assert_eq!(case.description(), "zero is falsy");
}

#[test]
fn empty_sequence_fails() {
    let mut suite = Suite::new("Sequences", demo_scope());
    let case = suite.get_or_create_sequence_case(Vec::<String>::new(), None);
    assert!(!case.evaluate());
    assert_eq!(failure(case).kind, FailureKind::AssertionFailed);
}

// ---
// Expected-error cases
// ---

#[test]
fn expected_error_kind_matches() {
    let mut suite = Suite::new("Errors", demo_scope());
    let case = suite.get_or_create_error_case("1/0", FailureKind::DivisionByZero, None);
    assert!(case.evaluate());
    assert_eq!(case.description(), "1/0 raises DivisionByZero");
}

#[test]
fn expected_error_wrong_kind_reports_actual() {
    let mut suite = Suite::new("Errors", demo_scope());
    let case = suite.get_or_create_error_case("1/0", FailureKind::TypeMismatch, None);
    assert!(!case.evaluate());
    let failure = failure(case);
    assert_eq!(failure.kind, FailureKind::ExpectedErrorMismatch);
    assert_eq!(
        failure.message,
        "expected TypeMismatch, got DivisionByZero: division by zero"
    );
}

#[test]
fn expected_error_message_must_match_exactly() {
    let mut suite = Suite::new("Errors", demo_scope());
    assert!(suite
        .get_or_create_error_case("fail('boom')", FailureKind::UserError, Some("boom"))
        .evaluate());
    assert!(!suite
        .get_or_create_error_case("fail('boom!')", FailureKind::UserError, Some("boom"))
        .evaluate());
    assert!(!suite
        .get_or_create_error_case("fail('a boom')", FailureKind::UserError, Some("boom"))
        .evaluate());
}

#[test]
fn expected_error_same_message_different_kind_fails() {
    let mut suite = Suite::new("Errors", demo_scope());
    let case = suite.get_or_create_error_case(
        "fail('division by zero')",
        FailureKind::DivisionByZero,
        Some("division by zero"),
    );
    assert!(!case.evaluate());
    assert_eq!(failure(case).kind, FailureKind::ExpectedErrorMismatch);
}

#[test]
fn expected_error_without_message_accepts_any_message() {
    let mut suite = Suite::new("Errors", demo_scope());
    let case = suite.get_or_create_error_case("fail('anything')", FailureKind::UserError, None);
    assert!(case.evaluate());
}

#[test]
fn expected_error_nothing_raised() {
    let mut suite = Suite::new("Errors", demo_scope());
    let case = suite.get_or_create_error_case("x + 1", FailureKind::DivisionByZero, None);
    assert!(!case.evaluate());
    let failure = failure(case);
    assert_eq!(failure.kind, FailureKind::ExpectedErrorMismatch);
    assert_eq!(
        failure.message,
        "expected DivisionByZero, but nothing was raised (got 43)"
    );
}

#[test]
fn expected_error_can_expect_syntax_errors() {
    let mut suite = Suite::new("Errors", demo_scope());
    let case = suite.get_or_create_error_case("1 +", FailureKind::SyntaxError, None);
    assert!(case.evaluate());
}

// ---
// Re-evaluation
// ---

#[test]
fn re_evaluation_resets_outcome() {
    let scope = demo_scope();
    let mut suite = Suite::new("Rerun", scope.clone());
    let case = suite.get_or_create_case("x == 42", None);
    assert!(case.evaluate());

    scope.borrow_mut().bind("x", 7i64);
    assert!(!case.evaluate());
    assert_eq!(failure(case).kind, FailureKind::AssertionFailed);

    scope.borrow_mut().bind("x", 42i64);
    assert!(case.evaluate());
    assert_eq!(case.outcome(), &Outcome::Passed);
}

#[test]
fn self_mutating_case_sees_its_own_mutation_on_rerun() {
    let scope = demo_scope();
    scope.borrow_mut().bind("counter", 0i64);
    let mut suite = Suite::new("Rerun", scope.clone());
    let case = suite.get_or_create_sequence_case(["counter = counter + 1", "counter == 1"], None);

    assert!(case.evaluate());
    assert!(!case.evaluate());
    assert_eq!(
        scope.borrow().get("counter"),
        Some(&verity::ast::Value::Int(2))
    );
}
