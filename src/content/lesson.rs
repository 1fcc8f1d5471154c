//! Lesson and module definitions as they appear in the YAML content files.

use crate::db::Row;
use crate::error::{Result, SqleanError};
use serde::{Deserialize, Serialize};

/// One entry of `manifest.yml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModuleInfo {
    /// Module identifier, e.g. `01_select`.
    pub id: String,

    /// Display title.
    #[serde(default)]
    pub title: String,

    /// Dataset every lesson in this module runs against.
    pub dataset: String,

    /// Module file, relative to the content directory.
    pub file: String,
}

/// The course manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Course title shown in the welcome banner.
    #[serde(default = "default_course_title")]
    pub title: String,

    /// Modules in teaching order.
    #[serde(default)]
    pub modules: Vec<ModuleInfo>,
}

fn default_course_title() -> String {
    "SQLean".to_string()
}

/// The contents of one module file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleFile {
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

/// A single lesson: instructional text plus how to grade the exercise.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lesson {
    pub id: u32,
    pub title: String,

    /// Concept explanation.
    #[serde(default)]
    pub text: String,

    /// The task the learner has to solve.
    #[serde(default)]
    pub exercise: String,

    #[serde(default)]
    pub hint: Option<String>,

    /// Short schema reminder printed under the exercise.
    #[serde(default)]
    pub schema_snippet: Option<String>,

    #[serde(flatten)]
    pub spec: LessonSpec,
}

/// The grading half of a lesson.
///
/// `validation_type` is kept as written so that an unknown type surfaces as
/// an error at validation time instead of making the whole module unloadable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LessonSpec {
    pub validation_type: String,

    /// Reference answer (`results_match`, `keyword_check`; shown by `!solve`).
    #[serde(default)]
    pub solution_query: Option<String>,

    /// Read run after the learner's statement (`state_check`).
    #[serde(default)]
    pub validation_query: Option<String>,

    /// Rows `validation_query` must return, in order (`state_check`).
    #[serde(default)]
    pub expected_results: Option<Vec<Row>>,

    /// Keywords the query text must contain (`keyword_check`).
    #[serde(default)]
    pub required_keywords: Vec<String>,
}

impl LessonSpec {
    /// Returns the solution query or a `LessonIncomplete` error.
    pub fn require_solution(&self) -> Result<&str> {
        self.solution_query
            .as_deref()
            .ok_or(SqleanError::LessonIncomplete("solution_query"))
    }

    /// Returns the validation query or a `LessonIncomplete` error.
    pub fn require_validation_query(&self) -> Result<&str> {
        self.validation_query
            .as_deref()
            .ok_or(SqleanError::LessonIncomplete("validation_query"))
    }

    /// Returns the expected rows or a `LessonIncomplete` error.
    pub fn require_expected_results(&self) -> Result<&[Row]> {
        self.expected_results
            .as_deref()
            .ok_or(SqleanError::LessonIncomplete("expected_results"))
    }
}
