//! Exercise validation for SQLean.
//!
//! The [`Validator`] pre-screens a learner's statement in a throwaway
//! sandbox, then hands it to the [`ValidationStrategy`] named by the lesson.
//! Strategies provision their own sandboxes, so whatever the pre-screen run
//! changed is never visible to them.

mod compare;
mod keyword_check;
mod results_match;
mod state_check;

pub use compare::{rows_equal_as_sets, rows_equal_ordered, values_equal, ComparisonMode};
pub use keyword_check::KeywordCheck;
pub use results_match::ResultsMatch;
pub use state_check::StateCheck;

use crate::content::LessonSpec;
use crate::db::{DatasetStore, QueryOutcome, TabularResult};
use crate::error::{Result, SqleanError};
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// The validation policies a lesson can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationKind {
    ResultsMatch,
    StateCheck,
    KeywordCheck,
}

impl ValidationKind {
    /// Returns the name used in lesson files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResultsMatch => "results_match",
            Self::StateCheck => "state_check",
            Self::KeywordCheck => "keyword_check",
        }
    }

    /// Returns the strategy implementing this policy.
    pub fn strategy(&self) -> &'static dyn ValidationStrategy {
        match self {
            Self::ResultsMatch => &ResultsMatch,
            Self::StateCheck => &StateCheck,
            Self::KeywordCheck => &KeywordCheck,
        }
    }
}

impl FromStr for ValidationKind {
    type Err = SqleanError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "results_match" => Ok(Self::ResultsMatch),
            "state_check" => Ok(Self::StateCheck),
            "keyword_check" => Ok(Self::KeywordCheck),
            other => Err(SqleanError::UnknownValidationType(other.to_string())),
        }
    }
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A strategy's pass/fail decision and the message explaining it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub passed: bool,
    pub message: String,
}

impl Verdict {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }
}

/// The outcome of grading one submitted statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub passed: bool,
    pub message: String,

    /// What the learner's statement returned, for display. `None` when it
    /// produced no relation (mutations) or failed outright.
    pub learner_result: Option<TabularResult>,
}

impl ValidationResult {
    fn from_verdict(verdict: Verdict, learner_result: Option<TabularResult>) -> Self {
        Self {
            passed: verdict.passed,
            message: verdict.message,
            learner_result,
        }
    }
}

/// A policy deciding whether a learner's statement is correct.
///
/// Learner mistakes are `Ok` with a failing [`Verdict`]; `Err` is reserved
/// for broken lessons and datasets.
///
/// Futures are not `Send`; grading runs on the current-thread runtime.
#[async_trait(?Send)]
pub trait ValidationStrategy {
    /// Grades `query` against `dataset` according to `lesson`.
    async fn evaluate(
        &self,
        datasets: &DatasetStore,
        dataset: &str,
        query: &str,
        lesson: &LessonSpec,
    ) -> Result<Verdict>;
}

/// Message prefix for statements the engine rejected.
pub(crate) fn query_error_message(error: &str) -> String {
    format!("Your query has an error: {error}")
}

/// Runs one statement in a sandbox of its own and closes it.
pub(crate) async fn execute_isolated(
    datasets: &DatasetStore,
    dataset: &str,
    sql: &str,
) -> Result<QueryOutcome> {
    let mut sandbox = datasets.provision(dataset).await?;
    let outcome = sandbox.execute(sql).await;
    sandbox.close().await;
    Ok(outcome)
}

/// Routes submitted statements to the lesson's validation strategy.
#[derive(Debug, Clone)]
pub struct Validator {
    datasets: DatasetStore,
}

impl Validator {
    /// Creates a validator over the given dataset store.
    pub fn new(datasets: DatasetStore) -> Self {
        Self { datasets }
    }

    /// The dataset store sandboxes are provisioned from.
    pub fn datasets(&self) -> &DatasetStore {
        &self.datasets
    }

    /// Grades a learner's statement.
    ///
    /// Returns `Err` only for content problems (missing or corrupt dataset,
    /// broken lesson); every learner mistake is an `Ok` with `passed == false`.
    pub async fn validate(
        &self,
        dataset: &str,
        query: &str,
        lesson: &LessonSpec,
    ) -> Result<ValidationResult> {
        let outcome = execute_isolated(&self.datasets, dataset, query).await?;

        let learner_result = match outcome {
            QueryOutcome::Failed(error) => {
                debug!("Pre-screen rejected query: {error}");
                return Ok(ValidationResult {
                    passed: false,
                    message: format!("Your query has an error:\n{error}"),
                    learner_result: None,
                });
            }
            other => other.into_tabular(),
        };

        let kind: ValidationKind = lesson.validation_type.parse()?;
        debug!("Validating with {kind}");

        let verdict = kind
            .strategy()
            .evaluate(&self.datasets, dataset, query, lesson)
            .await?;

        Ok(ValidationResult::from_verdict(verdict, learner_result))
    }
}
