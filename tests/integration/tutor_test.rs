//! Scripted sessions of the interactive tutor.

use super::{fixture_content, fixture_datasets};
use pretty_assertions::assert_eq;
use sqlean::content::{Course, LessonRef};
use sqlean::history::{history_path_for, InputHistory};
use sqlean::progress::ProgressStore;
use sqlean::tutor::{Console, SessionEnd, Tutor};
use sqlean::validation::Validator;
use std::path::Path;
use tempfile::TempDir;

fn scratch_progress() -> (ProgressStore, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = ProgressStore::new(dir.path().join("progress.json"));
    (store, dir)
}

async fn run_session(content: &Path, progress: &ProgressStore, script: &str) -> (SessionEnd, String) {
    let course = Course::load(content).unwrap();
    let console = Console::new(Vec::new(), false, 80, 50);
    let mut tutor = Tutor::new(
        course,
        Validator::new(fixture_datasets()),
        progress.clone(),
        script.as_bytes(),
        console,
    );

    let end = tutor.run().await.unwrap();
    let output = String::from_utf8(tutor.into_console().into_inner()).unwrap();
    (end, output)
}

#[tokio::test]
async fn test_complete_course() {
    let (progress, _dir) = scratch_progress();
    let script = "\
SELECT name
  FROM employees;
SELECT employees.name, departments.name FROM employees JOIN departments ON employees.department_id = departments.id;
UPDATE orders SET status = 'shipped' WHERE id = 1;
";

    let (end, output) = run_session(&fixture_content(), &progress, script).await;

    assert_eq!(end, SessionEnd::Finished);
    assert!(output.contains("Welcome to Fixture Course!"));
    assert!(output.contains("Basics | Lesson 1: Names"));
    assert!(output.contains("List every employee name."));
    assert!(output.contains("SQL> ...> "));
    assert!(output.contains("Correct! The database state was updated successfully."));
    assert_eq!(output.matches("Moving to the next lesson...").count(), 2);
    assert!(output.contains("Congratulations! You have completed the entire course!"));
    assert!(output.trim_end().ends_with("Goodbye!"));

    let saved = progress.load();
    assert_eq!(saved.completed_count(), 3);
    assert!(saved.is_completed(&LessonRef::new("02_changes", 1)));
}

#[tokio::test]
async fn test_wrong_answer_shows_learner_rows() {
    let (progress, _dir) = scratch_progress();
    let script = "SELECT name FROM employees WHERE id = 1;\n";

    let (end, output) = run_session(&fixture_content(), &progress, script).await;

    assert_eq!(end, SessionEnd::Quit);
    assert!(output.contains("Incorrect."));
    assert!(output.contains("This is what your query returned:"));
    assert!(output.contains("│ Alice "));
    assert!(output.contains("1 row returned"));
    assert!(output.contains("Goodbye!"));
    assert!(!output.contains("Congratulations"));

    // Nothing was passed, so nothing was saved
    assert!(!progress.path().exists());
}

#[tokio::test]
async fn test_empty_result_message() {
    let (progress, _dir) = scratch_progress();
    let script = "SELECT name FROM employees WHERE id = 99;\n";

    let (_, output) = run_session(&fixture_content(), &progress, script).await;
    assert!(output.contains("This is what your query returned:\nQuery returned no rows."));
}

#[tokio::test]
async fn test_query_error_is_shown() {
    let (progress, _dir) = scratch_progress();
    let (_, output) = run_session(&fixture_content(), &progress, "SELEC name FROM employees;\n").await;

    assert!(output.contains("Your query has an error:"));
    assert!(output.contains("syntax error"));
    assert!(!output.contains("This is what your query returned:"));
}

#[tokio::test]
async fn test_meta_commands() {
    let (progress, _dir) = scratch_progress();
    let script = "!help\n!hint\n!schema\n!solve\n!quit\nSELECT name FROM employees;\n";

    let (end, output) = run_session(&fixture_content(), &progress, script).await;

    assert_eq!(end, SessionEnd::Quit);
    assert!(output.contains("!schema  - Show the database schema for this lesson"));
    assert!(output.contains("Use SELECT name."));
    assert!(output.contains("--- DATABASE SCHEMA ---"));
    assert!(output.contains("-- employees --"));
    assert!(output.contains("╭─ Solution "));
    assert!(output.contains("SELECT name FROM employees;"));
    // Input after !quit is never graded
    assert!(!output.contains("Correct!"));
}

#[tokio::test]
async fn test_resume_from_saved_progress() {
    let (progress, _dir) = scratch_progress();
    progress
        .record(&LessonRef::new("02_changes", 1), false)
        .unwrap();

    let (end, output) = run_session(&fixture_content(), &progress, "!quit\n").await;

    assert_eq!(end, SessionEnd::Quit);
    assert!(output.contains("Lesson 1: Ship it"));
    assert!(!output.contains("Lesson 1: Names"));
}

#[tokio::test]
async fn test_stale_progress_restarts_course() {
    let (progress, _dir) = scratch_progress();
    progress
        .record(&LessonRef::new("09_removed", 4), false)
        .unwrap();

    let (_, output) = run_session(&fixture_content(), &progress, "").await;
    assert!(output.contains("Lesson 1: Names"));
}

#[tokio::test]
async fn test_broken_lesson_is_reported_separately() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("manifest.yml"),
        "modules:\n  - id: odd\n    title: Odd\n    dataset: employees_db\n    file: odd.yml\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("odd.yml"),
        "lessons:\n  - id: 1\n    title: Fuzzy\n    validation_type: fuzzy_match\n",
    )
    .unwrap();
    let (progress, _progress_dir) = scratch_progress();

    let (end, output) = run_session(dir.path(), &progress, "SELECT 1;\n").await;

    assert_eq!(end, SessionEnd::Quit);
    assert!(output.contains("╭─ Lesson error "));
    assert!(output.contains("Error: Unknown validation type in lesson file."));
    assert!(!output.contains("Incorrect."));
}

#[tokio::test]
async fn test_pending_statement_at_end_of_input() {
    let (progress, _dir) = scratch_progress();
    let (end, output) = run_session(&fixture_content(), &progress, "SELECT name\nFROM employees\n").await;

    assert_eq!(end, SessionEnd::Quit);
    assert!(!output.contains("Correct!"));
    assert!(output.contains("Goodbye!"));
}

#[tokio::test]
async fn test_submitted_statements_are_kept_in_history() {
    let (progress, _dir) = scratch_progress();
    let history_path = history_path_for(progress.path());
    std::fs::write(&history_path, "SELECT 'from last time';\n").unwrap();

    let course = Course::load(&fixture_content()).unwrap();
    let mut tutor = Tutor::new(
        course,
        Validator::new(fixture_datasets()),
        progress.clone(),
        "SELECT name\n  FROM employees WHERE id = 1;\n!history\n".as_bytes(),
        Console::new(Vec::new(), false, 80, 50),
    )
    .with_history(InputHistory::load(&history_path));

    tutor.run().await.unwrap();
    assert_eq!(
        tutor.history().entries(),
        &[
            "SELECT 'from last time';",
            "SELECT name FROM employees WHERE id = 1;"
        ]
    );
    let output = String::from_utf8(tutor.into_console().into_inner()).unwrap();

    assert!(output.contains("╭─ History "));
    assert!(output.contains(" 1. SELECT 'from last time';"));
    assert!(output.contains(" 2. SELECT name FROM employees WHERE id = 1;"));

    let on_disk = std::fs::read_to_string(&history_path).unwrap();
    assert_eq!(
        on_disk,
        "SELECT 'from last time';\nSELECT name FROM employees WHERE id = 1;\n"
    );
}

#[tokio::test]
async fn test_history_without_submissions() {
    let (progress, _dir) = scratch_progress();
    let (_, output) = run_session(&fixture_content(), &progress, "!history\n").await;

    assert!(output.contains("No statements submitted yet."));
}
