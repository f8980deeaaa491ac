//! Failure kinds, plan loading and diagnostic metadata.

use miette::Diagnostic;
use verity::harness::HarnessConfig;
use verity::plan::{CasePlan, Plan, PlanError};
use verity::syntax::parse_expression;
use verity::FailureKind;

#[test]
fn failure_kind_names_round_trip() {
    for kind in FailureKind::ALL {
        assert_eq!(kind.as_str().parse::<FailureKind>().unwrap(), kind);
    }
    let err = "ZeroDivisionError".parse::<FailureKind>().unwrap_err();
    assert_eq!(err.to_string(), "unknown failure kind 'ZeroDivisionError'");
}

#[test]
fn synthesized_kinds() {
    assert!(FailureKind::AssertionFailed.is_synthesized());
    assert!(FailureKind::ExpectedErrorMismatch.is_synthesized());
    assert!(!FailureKind::DivisionByZero.is_synthesized());
}

#[test]
fn syntax_error_carries_code_and_label() {
    let err = parse_expression("1 + ").unwrap_err();
    assert_eq!(
        err.code().map(|code| code.to_string()),
        Some("verity::syntax".to_string())
    );
    let labels: Vec<_> = err.labels().into_iter().flatten().collect();
    assert_eq!(labels.len(), 1);
    assert!(err.source_code().is_some());
}

#[test]
fn eval_error_codes() {
    let scope = verity::Scope::new();
    let err = scope.eval("1 / 0").unwrap_err();
    assert_eq!(
        err.code().map(|code| code.to_string()),
        Some("verity::eval::division_by_zero".to_string())
    );
}

// ---
// Plans
// ---

const PLAN: &str = r#"
setup:
  - "x = 42"
  - "addition = fn(a, b) => a + b"
suites:
  - name: "Question 1"
    cases:
      - expr: "x == 42"
      - expr: "z == 42"
        description: "z is bound"
  - name: "Question 2"
    cases:
      - expr: "addition(1, 1) == 2"
      - lines: ["y = 5", "y == 5"]
      - expr: "1 / 0"
        raises: DivisionByZero
        message: "division by zero"
"#;

#[test]
fn plan_parses_every_case_form() {
    let plan = Plan::from_yaml(PLAN).unwrap();
    assert_eq!(plan.setup.len(), 2);
    assert_eq!(plan.suites.len(), 2);
    assert_eq!(
        plan.suites[0].cases[1],
        CasePlan::Plain {
            expr: "z == 42".to_string(),
            description: Some("z is bound".to_string())
        }
    );
    assert!(matches!(
        plan.suites[1].cases[1],
        CasePlan::Sequence { ref lines, description: None } if lines.len() == 2
    ));
    assert_eq!(
        plan.suites[1].cases[2],
        CasePlan::ExpectError {
            expr: "1 / 0".to_string(),
            raises: FailureKind::DivisionByZero,
            message: Some("division by zero".to_string())
        }
    );
}

#[test]
fn plan_builds_runner_with_setup_applied() {
    let plan = Plan::from_yaml(PLAN).unwrap();
    let mut runner = plan.build_runner(HarnessConfig::default()).unwrap();
    assert!(runner.scope().borrow().contains("addition"));

    let summary = runner.evaluate();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.passing, 1);
    let q1 = runner.suite("Question 1").unwrap();
    assert_eq!(q1.cases()[1].description(), "z is bound");
}

#[test]
fn plan_rejects_unknown_kind() {
    let err = Plan::from_yaml(
        r#"
suites:
  - name: "Bad"
    cases:
      - expr: "1 / 0"
        raises: ZeroDivisionError
"#,
    )
    .unwrap_err();
    assert!(matches!(err, PlanError::Format(_)));
}

#[test]
fn plan_rejects_unknown_top_level_field() {
    let err = Plan::from_yaml("suites: []\nteardown: []\n").unwrap_err();
    assert!(matches!(err, PlanError::Format(_)));
}

#[test]
fn plan_setup_failure_names_statement() {
    let plan = Plan::from_yaml("setup:\n  - \"x = missing + 1\"\n").unwrap();
    let err = plan.build_runner(HarnessConfig::default()).unwrap_err();
    assert_eq!(err.to_string(), "setup statement `x = missing + 1` failed");
    let PlanError::Setup { source, .. } = err else {
        panic!("expected a setup error");
    };
    assert_eq!(source.kind(), FailureKind::UndefinedName);
}

fn load_single_case(case: &str) -> Result<Plan, PlanError> {
    Plan::from_yaml(&format!(
        "suites:\n  - name: \"One\"\n    cases:\n      - {}\n",
        case
    ))
}

#[test]
fn plan_unknown_kind_is_not_downgraded_to_plain() {
    let err = load_single_case("{ expr: \"1 / 0\", raises: ZeroDivision }").unwrap_err();
    let PlanError::Format(inner) = err else {
        panic!("expected a format error");
    };
    assert!(inner.to_string().contains("ZeroDivision"));
}

#[test]
fn plan_rejects_message_without_raises() {
    let err = load_single_case("{ expr: \"1 / 0\", message: \"division by zero\" }").unwrap_err();
    assert!(matches!(err, PlanError::Format(_)));
    assert!(err.to_string().contains("`message` is only valid together with `raises`"));
}

#[test]
fn plan_rejects_misspelled_case_key() {
    let err = load_single_case("{ expr: \"x == 42\", desription: \"typo\" }").unwrap_err();
    assert!(matches!(err, PlanError::Format(_)));
    assert!(err.to_string().contains("desription"));
}

#[test]
fn plan_rejects_ambiguous_case_forms() {
    assert!(load_single_case("{ expr: \"x\", lines: [\"x\"] }").is_err());
    assert!(load_single_case("{ lines: [\"1 / 0\"], raises: DivisionByZero }").is_err());
    assert!(load_single_case("{ expr: \"1 / 0\", raises: DivisionByZero, description: \"d\" }").is_err());
    assert!(load_single_case("{ description: \"nothing to run\" }").is_err());
}

#[test]
fn plan_error_case_without_message() {
    let plan = load_single_case("{ expr: \"1 / 0\", raises: DivisionByZero }").unwrap();
    assert_eq!(
        plan.suites[0].cases[0],
        CasePlan::ExpectError {
            expr: "1 / 0".to_string(),
            raises: FailureKind::DivisionByZero,
            message: None
        }
    );
}
