//! `results_match`: the learner's rows must equal the reference rows.

use super::{
    execute_isolated, query_error_message, rows_equal_as_sets, ValidationStrategy, Verdict,
};
use crate::content::LessonSpec;
use crate::db::{DatasetStore, QueryOutcome};
use crate::error::{Result, SqleanError};
use async_trait::async_trait;
use tracing::debug;

pub(crate) const CORRECT: &str = "Correct!";
pub(crate) const MISMATCH: &str =
    "Incorrect. Your query ran, but the results did not match the expected output.";

/// Compares the learner's result set with the lesson's `solution_query`.
///
/// Each query runs in its own sandbox. Rows are compared as sets, so row
/// order, duplicate counts and column names do not matter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultsMatch;

#[async_trait(?Send)]
impl ValidationStrategy for ResultsMatch {
    async fn evaluate(
        &self,
        datasets: &DatasetStore,
        dataset: &str,
        query: &str,
        lesson: &LessonSpec,
    ) -> Result<Verdict> {
        let solution_query = lesson.require_solution()?;

        let learner = execute_isolated(datasets, dataset, query).await?;
        if let QueryOutcome::Failed(error) = &learner {
            return Ok(Verdict::fail(query_error_message(error)));
        }

        let solution = execute_isolated(datasets, dataset, solution_query).await?;
        if let QueryOutcome::Failed(error) = &solution {
            return Err(SqleanError::LessonSolutionInvalid(error.clone()));
        }

        let (matched, mode) = rows_equal_as_sets(learner.rows(), solution.rows());
        debug!(
            "results_match ({mode:?}): learner {} row(s), solution {} row(s), matched={matched}",
            learner.rows().len(),
            solution.rows().len()
        );

        Ok(if matched {
            Verdict::pass(CORRECT)
        } else {
            Verdict::fail(MISMATCH)
        })
    }
}
