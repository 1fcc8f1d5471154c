//! Integration tests for sandbox provisioning and statement execution.

use super::fixture_datasets;
use pretty_assertions::assert_eq;
use sqlean::db::{DatasetStore, QueryOutcome, Value};
use sqlean::error::SqleanError;

#[tokio::test]
async fn test_provisioning_twice_gives_identical_reads() {
    let datasets = fixture_datasets();
    let sql = "SELECT id, name, department_id, salary FROM employees ORDER BY id;";

    let mut first = datasets.provision("employees_db").await.unwrap();
    let mut second = datasets.provision("employees_db").await.unwrap();

    let a = first.execute(sql).await;
    let b = second.execute(sql).await;
    first.close().await;
    second.close().await;

    assert_eq!(a.rows(), b.rows());
    assert_eq!(a.rows().len(), 4);
    assert_eq!(
        a.rows()[3],
        vec![
            Value::Int(4),
            Value::from("Dan"),
            Value::Null,
            Value::Int(40000)
        ]
    );
}

#[tokio::test]
async fn test_sandboxes_are_private() {
    let datasets = fixture_datasets();
    let mut writer = datasets.provision("shop_db").await.unwrap();
    let mut reader = datasets.provision("shop_db").await.unwrap();

    let outcome = writer.execute("DELETE FROM orders;").await;
    assert_eq!(outcome, QueryOutcome::Mutation { rows_affected: 2 });

    let remaining = reader.execute("SELECT COUNT(*) FROM orders;").await;
    assert_eq!(remaining.rows(), &[vec![Value::Int(2)]]);

    writer.close().await;
    reader.close().await;
}

#[tokio::test]
async fn test_result_columns_and_types() {
    let datasets = fixture_datasets();
    let mut sandbox = datasets.provision("employees_db").await.unwrap();

    let outcome = sandbox
        .execute("SELECT name AS who, salary / 1000.0 AS k, NULL AS nothing FROM employees WHERE id = 1;")
        .await;
    sandbox.close().await;

    let table = outcome.tabular().unwrap();
    assert_eq!(table.column_names(), vec!["who", "k", "nothing"]);
    assert_eq!(
        table.rows,
        vec![vec![Value::from("Alice"), Value::Float(90.0), Value::Null]]
    );
}

#[tokio::test]
async fn test_engine_errors_are_reported_verbatim() {
    let datasets = fixture_datasets();
    let mut sandbox = datasets.provision("shop_db").await.unwrap();

    let missing = sandbox.execute("SELECT * FROM ordrs;").await;
    assert_eq!(missing.error(), Some("no such table: ordrs"));

    let duplicate = sandbox
        .execute("INSERT INTO customers (name) VALUES ('Ada');")
        .await;
    assert_eq!(
        duplicate.error(),
        Some("UNIQUE constraint failed: customers.name")
    );

    let syntax = sandbox.execute("SELEC 1;").await;
    assert!(!syntax.is_ok());
    assert!(syntax.error().unwrap().contains("syntax error"));

    sandbox.close().await;
}

#[tokio::test]
async fn test_mutation_reports_rows_affected() {
    let datasets = fixture_datasets();
    let mut sandbox = datasets.provision("shop_db").await.unwrap();

    let outcome = sandbox
        .execute("UPDATE orders SET status = 'shipped' WHERE id = 1;")
        .await;
    assert_eq!(outcome, QueryOutcome::Mutation { rows_affected: 1 });
    assert!(outcome.tabular().is_none());

    let after = sandbox
        .execute("SELECT status FROM orders WHERE id = 1;")
        .await;
    assert_eq!(after.rows(), &[vec![Value::from("shipped")]]);

    sandbox.close().await;
}

#[tokio::test]
async fn test_corrupt_seed_data() {
    let err = fixture_datasets().provision("broken_db").await.unwrap_err();

    match &err {
        SqleanError::DatasetCorrupt { dataset, file, .. } => {
            assert_eq!(dataset, "broken_db");
            assert_eq!(*file, "data.sql");
        }
        other => panic!("expected DatasetCorrupt, got {other:?}"),
    }
    assert!(err.to_string().contains("no such table: not_a_table"));
}

#[tokio::test]
async fn test_missing_dataset_files() {
    let datasets = fixture_datasets();

    let half = datasets.provision("half_db").await.unwrap_err();
    assert!(matches!(half, SqleanError::DatasetNotFound { ref dataset, .. } if dataset == "half_db"));

    let absent = datasets.provision("no_such_db").await.unwrap_err();
    assert!(matches!(absent, SqleanError::DatasetNotFound { .. }));
    assert_eq!(
        absent.learner_message(),
        "Error: Could not load dataset for validation."
    );
}

#[tokio::test]
async fn test_schema_text() {
    let schema = fixture_datasets().schema_text("shop_db").await.unwrap();

    assert!(schema.starts_with("--- DATABASE SCHEMA ---\n\n-- orders --\nCREATE TABLE orders"));
    assert!(schema.contains("\n\n-- customers --\nCREATE TABLE customers"));
    assert!(schema.ends_with(");"));
}

#[tokio::test]
async fn test_schema_text_of_empty_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let empty = dir.path().join("empty_db");
    std::fs::create_dir(&empty).unwrap();
    std::fs::write(empty.join("schema.sql"), "-- nothing yet\n").unwrap();
    std::fs::write(empty.join("data.sql"), "").unwrap();

    let datasets = DatasetStore::new(dir.path());
    assert_eq!(
        datasets.schema_text("empty_db").await.unwrap(),
        "No tables found in this database."
    );
}

#[tokio::test]
async fn test_one_statement_per_submission() {
    let datasets = fixture_datasets();
    let mut sandbox = datasets.provision("shop_db").await.unwrap();

    let chained = sandbox
        .execute("UPDATE orders SET status = 'lost'; DELETE FROM orders;")
        .await;
    assert_eq!(
        chained.error(),
        Some("You can only execute one statement at a time.")
    );

    let statuses = sandbox
        .execute("SELECT status FROM orders ORDER BY id;")
        .await;
    assert_eq!(
        statuses.rows(),
        &[vec![Value::from("pending")], vec![Value::from("shipped")]]
    );

    sandbox.close().await;
}
