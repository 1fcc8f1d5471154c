//! `state_check`: grade a mutation by the state it leaves behind.

use super::{query_error_message, rows_equal_ordered, ValidationStrategy, Verdict};
use crate::content::LessonSpec;
use crate::db::{DatasetStore, QueryOutcome};
use crate::error::{Result, SqleanError};
use async_trait::async_trait;
use tracing::debug;

pub(crate) const STATE_CORRECT: &str = "Correct! The database state was updated successfully.";
pub(crate) const STATE_MISMATCH: &str =
    "Incorrect. Your query ran, but the resulting database state was not correct.";

/// Runs the learner's statement and then the lesson's `validation_query` on
/// the same sandbox, and compares the latter's rows, in order, with
/// `expected_results`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateCheck;

#[async_trait(?Send)]
impl ValidationStrategy for StateCheck {
    async fn evaluate(
        &self,
        datasets: &DatasetStore,
        dataset: &str,
        query: &str,
        lesson: &LessonSpec,
    ) -> Result<Verdict> {
        let validation_query = lesson.require_validation_query()?;
        let expected = lesson.require_expected_results()?;

        let mut sandbox = datasets.provision(dataset).await?;

        let mutation = sandbox.execute(query).await;
        if let QueryOutcome::Failed(error) = mutation {
            sandbox.close().await;
            return Ok(Verdict::fail(query_error_message(&error)));
        }

        let state = sandbox.execute(validation_query).await;
        sandbox.close().await;

        let actual = match state {
            QueryOutcome::Rows(result) => result.rows,
            QueryOutcome::Failed(error) => {
                return Err(SqleanError::LessonValidationQueryInvalid(error));
            }
            QueryOutcome::Mutation { .. } => {
                return Err(SqleanError::LessonValidationQueryInvalid(
                    "the validation query returned no result set".to_string(),
                ));
            }
        };

        if rows_equal_ordered(&actual, expected) {
            Ok(Verdict::pass(STATE_CORRECT))
        } else {
            debug!("State check failed. Actual: {actual:?} | Expected: {expected:?}");
            Ok(Verdict::fail(STATE_MISMATCH))
        }
    }
}
