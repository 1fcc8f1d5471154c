//! Course self-check: grades every lesson's reference solution through the
//! validator to find lessons that can never be passed.

use crate::content::{Course, LessonRef};
use crate::error::Result;
use crate::validation::Validator;
use std::fmt;
use tracing::{error, info};

/// What grading a lesson's own solution produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Passed,
    /// The solution ran but was graded wrong.
    Wrong(String),
    /// The lesson or its dataset is broken.
    LessonError(String),
}

/// One line of the check report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonCheck {
    pub lesson: LessonRef,
    pub title: String,
    pub status: CheckStatus,
}

impl LessonCheck {
    pub fn is_ok(&self) -> bool {
        self.status == CheckStatus::Passed
    }
}

impl fmt::Display for LessonCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            CheckStatus::Passed => write!(f, "ok     {} {}", self.lesson, self.title),
            CheckStatus::Wrong(msg) => write!(f, "WRONG  {} {}: {}", self.lesson, self.title, msg),
            CheckStatus::LessonError(msg) => {
                write!(f, "ERROR  {} {}: {}", self.lesson, self.title, msg)
            }
        }
    }
}

/// Grades the reference solution of every lesson, in course order.
///
/// Authoring errors are reported per lesson. Anything else (I/O, the
/// engine itself) aborts the check.
pub async fn check_course(course: &Course, validator: &Validator) -> Result<Vec<LessonCheck>> {
    let mut report = Vec::new();

    for (module, lesson) in course.all_lessons() {
        let at = LessonRef::new(&module.id, lesson.id);

        let status = match &lesson.spec.solution_query {
            None => CheckStatus::LessonError("lesson has no solution_query".to_string()),
            Some(solution) => match validator.validate(&module.dataset, solution, &lesson.spec).await {
                Ok(result) if result.passed => CheckStatus::Passed,
                Ok(result) => CheckStatus::Wrong(result.message),
                Err(e) if e.is_authoring() => {
                    error!("Lesson {at} is broken: {e}");
                    CheckStatus::LessonError(e.to_string())
                }
                Err(e) => return Err(e),
            },
        };

        report.push(LessonCheck {
            lesson: at,
            title: lesson.title.clone(),
            status,
        });
    }

    let failures = report.iter().filter(|c| !c.is_ok()).count();
    info!("Checked {} lesson(s), {failures} problem(s)", report.len());
    Ok(report)
}
