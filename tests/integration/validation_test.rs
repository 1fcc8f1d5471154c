//! Integration tests for the validator and its three strategies.

use super::{fixture_datasets, lesson_spec};
use pretty_assertions::assert_eq;
use sqlean::content::LessonSpec;
use sqlean::db::Value;
use sqlean::error::SqleanError;
use sqlean::validation::{ValidationKind, Validator};

const MISMATCH: &str =
    "Incorrect. Your query ran, but the results did not match the expected output.";

fn validator() -> Validator {
    Validator::new(fixture_datasets())
}

fn names_lesson() -> LessonSpec {
    lesson_spec(
        r#"
validation_type: results_match
solution_query: SELECT name FROM employees;
"#,
    )
}

fn ship_order_lesson() -> LessonSpec {
    lesson_spec(
        r#"
validation_type: state_check
validation_query: SELECT status FROM orders WHERE id = 1;
expected_results:
  - [shipped]
"#,
    )
}

fn join_lesson() -> LessonSpec {
    lesson_spec(
        r#"
validation_type: keyword_check
required_keywords: [JOIN]
solution_query: >-
  SELECT employees.name, departments.name
  FROM employees JOIN departments ON employees.department_id = departments.id;
"#,
    )
}

#[tokio::test]
async fn test_results_match_exact() {
    let result = validator()
        .validate("employees_db", "SELECT name FROM employees;", &names_lesson())
        .await
        .unwrap();

    assert!(result.passed);
    assert_eq!(result.message, "Correct!");
    assert_eq!(result.learner_result.unwrap().row_count(), 4);
}

#[tokio::test]
async fn test_results_match_ignores_order_and_duplicates() {
    let v = validator();
    let lesson = names_lesson();

    for query in [
        "SELECT name FROM employees ORDER BY name DESC;",
        "SELECT name FROM employees UNION ALL SELECT name FROM employees;",
        "SELECT e.name AS employee FROM employees e;",
    ] {
        let result = v.validate("employees_db", query, &lesson).await.unwrap();
        assert!(result.passed, "expected {query:?} to pass: {}", result.message);
    }
}

#[tokio::test]
async fn test_results_match_detects_a_missing_row() {
    let result = validator()
        .validate(
            "employees_db",
            "SELECT name FROM employees WHERE id < 4;",
            &names_lesson(),
        )
        .await
        .unwrap();

    assert!(!result.passed);
    assert_eq!(result.message, MISMATCH);

    let shown = result.learner_result.unwrap();
    assert_eq!(shown.column_names(), vec!["name"]);
    assert_eq!(shown.row_count(), 3);
}

#[tokio::test]
async fn test_numbers_compare_by_value() {
    let lesson = lesson_spec("validation_type: results_match\nsolution_query: SELECT 1;\n");

    let result = validator()
        .validate("employees_db", "SELECT 1.0;", &lesson)
        .await
        .unwrap();
    assert!(result.passed);
}

#[tokio::test]
async fn test_syntax_error_is_a_learner_error() {
    let result = validator()
        .validate("employees_db", "SELEC name FROM employees;", &names_lesson())
        .await
        .unwrap();

    assert!(!result.passed);
    assert!(result.message.starts_with("Your query has an error:\n"));
    assert!(result.message.contains("syntax error"));
    assert!(result.learner_result.is_none());
}

#[tokio::test]
async fn test_mutation_against_results_match_fails() {
    let result = validator()
        .validate("employees_db", "DELETE FROM employees;", &names_lesson())
        .await
        .unwrap();

    assert!(!result.passed);
    assert_eq!(result.message, MISMATCH);
    assert!(result.learner_result.is_none());
}

#[tokio::test]
async fn test_state_check_passes_on_correct_update() {
    let result = validator()
        .validate(
            "shop_db",
            "UPDATE orders SET status='shipped' WHERE id=1;",
            &ship_order_lesson(),
        )
        .await
        .unwrap();

    assert!(result.passed);
    assert_eq!(
        result.message,
        "Correct! The database state was updated successfully."
    );
    assert!(result.learner_result.is_none());
}

#[tokio::test]
async fn test_state_check_fails_on_no_op() {
    let v = validator();
    let lesson = ship_order_lesson();

    for query in [
        "UPDATE orders SET status='pending' WHERE id=1;",
        "UPDATE orders SET status='shipped' WHERE id=2;",
        "SELECT * FROM orders;",
    ] {
        let result = v.validate("shop_db", query, &lesson).await.unwrap();
        assert!(!result.passed, "expected {query:?} to fail");
        assert_eq!(
            result.message,
            "Incorrect. Your query ran, but the resulting database state was not correct."
        );
    }
}

#[tokio::test]
async fn test_state_check_is_order_sensitive() {
    let lesson = lesson_spec(
        r#"
validation_type: state_check
validation_query: SELECT id FROM orders ORDER BY id DESC;
expected_results: [[1], [2]]
"#,
    );

    let result = validator()
        .validate("shop_db", "UPDATE orders SET status = status;", &lesson)
        .await
        .unwrap();
    assert!(!result.passed);
}

#[tokio::test]
async fn test_state_check_sees_constraint_errors() {
    let lesson = lesson_spec(
        r#"
validation_type: state_check
validation_query: SELECT COUNT(*) FROM customers;
expected_results: [[3]]
"#,
    );

    let result = validator()
        .validate(
            "shop_db",
            "INSERT INTO customers (name) VALUES ('Ada');",
            &lesson,
        )
        .await
        .unwrap();

    assert!(!result.passed);
    assert!(result
        .message
        .contains("UNIQUE constraint failed: customers.name"));
}

#[tokio::test]
async fn test_keyword_check_names_the_missing_keyword() {
    let result = validator()
        .validate("employees_db", "SELECT name FROM employees;", &join_lesson())
        .await
        .unwrap();

    assert!(!result.passed);
    assert_eq!(
        result.message,
        "Hint: You must use the `JOIN` keyword for this exercise."
    );
}

#[tokio::test]
async fn test_keyword_check_then_compares_results() {
    let v = validator();
    let lesson = join_lesson();

    let wrong = v
        .validate(
            "employees_db",
            "SELECT employees.name FROM employees join departments ON employees.department_id = departments.id;",
            &lesson,
        )
        .await
        .unwrap();
    assert!(!wrong.passed);
    assert_eq!(wrong.message, MISMATCH);

    let right = v
        .validate(
            "employees_db",
            "select e.name, d.name from employees e join departments d on e.department_id = d.id;",
            &lesson,
        )
        .await
        .unwrap();
    assert!(right.passed);
}

#[tokio::test]
async fn test_validate_is_idempotent() {
    let v = validator();
    let lesson = ship_order_lesson();
    let query = "UPDATE orders SET status='shipped' WHERE id=1;";

    let first = v.validate("shop_db", query, &lesson).await.unwrap();
    let second = v.validate("shop_db", query, &lesson).await.unwrap();
    assert_eq!(first, second);

    // The earlier update must not leak into a later submission
    let no_op = v
        .validate("shop_db", "SELECT 1;", &lesson)
        .await
        .unwrap();
    assert!(!no_op.passed);
}

#[tokio::test]
async fn test_same_query_same_rows() {
    let v = validator();
    let lesson = names_lesson();
    let query = "SELECT name, salary FROM employees ORDER BY salary;";

    let a = v.validate("employees_db", query, &lesson).await.unwrap();
    let b = v.validate("employees_db", query, &lesson).await.unwrap();

    let (a, b) = (a.learner_result.unwrap(), b.learner_result.unwrap());
    assert_eq!(a.rows, b.rows);
    assert_eq!(a.rows[0], vec![Value::from("Dan"), Value::Int(40000)]);
}

#[tokio::test]
async fn test_unknown_validation_type() {
    let lesson = lesson_spec("validation_type: fuzzy_match\nsolution_query: SELECT 1;\n");
    let v = validator();

    let err = v
        .validate("employees_db", "SELECT 1;", &lesson)
        .await
        .unwrap_err();
    assert!(matches!(err, SqleanError::UnknownValidationType(ref t) if t == "fuzzy_match"));
    assert_eq!(
        err.learner_message(),
        "Error: Unknown validation type in lesson file."
    );

    // Broken SQL is still reported as the learner's mistake
    let result = v.validate("employees_db", "SELEC 1;", &lesson).await.unwrap();
    assert!(!result.passed);
}

#[tokio::test]
async fn test_broken_solution_is_a_lesson_error() {
    let lesson = lesson_spec(
        "validation_type: results_match\nsolution_query: SELECT nam FROM employees;\n",
    );

    let err = validator()
        .validate("employees_db", "SELECT name FROM employees;", &lesson)
        .await
        .unwrap_err();
    assert!(matches!(err, SqleanError::LessonSolutionInvalid(ref m) if m == "no such column: nam"));
    assert!(err.is_authoring());
}

#[tokio::test]
async fn test_broken_validation_query_is_a_lesson_error() {
    let v = validator();

    let failing = lesson_spec(
        r#"
validation_type: state_check
validation_query: SELECT state FROM orders;
expected_results: []
"#,
    );
    let err = v
        .validate("shop_db", "DELETE FROM orders;", &failing)
        .await
        .unwrap_err();
    assert!(matches!(err, SqleanError::LessonValidationQueryInvalid(_)));

    let not_a_query = lesson_spec(
        r#"
validation_type: state_check
validation_query: DELETE FROM orders;
expected_results: []
"#,
    );
    let err = v
        .validate("shop_db", "DELETE FROM orders;", &not_a_query)
        .await
        .unwrap_err();
    assert!(matches!(err, SqleanError::LessonValidationQueryInvalid(_)));
}

#[tokio::test]
async fn test_incomplete_lessons() {
    let v = validator();

    let no_solution = lesson_spec("validation_type: results_match\n");
    let err = v
        .validate("employees_db", "SELECT 1;", &no_solution)
        .await
        .unwrap_err();
    assert!(matches!(err, SqleanError::LessonIncomplete(_)));

    let no_validation_query = lesson_spec("validation_type: state_check\nexpected_results: []\n");
    let err = v
        .validate("shop_db", "SELECT 1;", &no_validation_query)
        .await
        .unwrap_err();
    assert!(matches!(err, SqleanError::LessonIncomplete(_)));
}

#[tokio::test]
async fn test_dataset_errors() {
    let v = validator();
    let lesson = names_lesson();

    let corrupt = v
        .validate("broken_db", "SELECT 1;", &lesson)
        .await
        .unwrap_err();
    assert!(matches!(corrupt, SqleanError::DatasetCorrupt { .. }));

    let missing = v
        .validate("half_db", "SELECT 1;", &lesson)
        .await
        .unwrap_err();
    assert!(matches!(missing, SqleanError::DatasetNotFound { .. }));
}

#[tokio::test]
async fn test_strategies_run_through_the_trait_object() {
    let datasets = fixture_datasets();

    let names = ValidationKind::ResultsMatch
        .strategy()
        .evaluate(&datasets, "employees_db", "SELECT name FROM employees;", &names_lesson())
        .await
        .unwrap();
    assert!(names.passed);

    let ship = ValidationKind::StateCheck
        .strategy()
        .evaluate(
            &datasets,
            "shop_db",
            "UPDATE orders SET status = 'shipped' WHERE id = 1;",
            &ship_order_lesson(),
        )
        .await
        .unwrap();
    assert!(ship.passed);

    let join = ValidationKind::KeywordCheck
        .strategy()
        .evaluate(&datasets, "employees_db", "SELECT name FROM employees;", &join_lesson())
        .await
        .unwrap();
    assert!(!join.passed);
}

#[tokio::test]
async fn test_chained_statements_are_rejected() {
    let result = validator()
        .validate(
            "shop_db",
            "UPDATE orders SET status = 'shipped' WHERE id = 1; DELETE FROM orders;",
            &ship_order_lesson(),
        )
        .await
        .unwrap();

    assert!(!result.passed);
    assert_eq!(
        result.message,
        "Your query has an error:\nYou can only execute one statement at a time."
    );
    assert!(result.learner_result.is_none());
}
