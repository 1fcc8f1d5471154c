//! Error types for SQLean.
//!
//! Learner mistakes (bad SQL, wrong answers) are never errors: they come back
//! as a failed [`ValidationResult`](crate::validation::ValidationResult).
//! Everything in this enum is either a broken lesson/dataset or a problem with
//! the tutor's own environment.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for SQLean operations.
#[derive(Error, Debug)]
pub enum SqleanError {
    /// A dataset directory is missing `schema.sql` or `data.sql`.
    #[error("Dataset '{dataset}' not found (expected {})", path.display())]
    DatasetNotFound { dataset: String, path: PathBuf },

    /// A dataset's schema or seed file failed to execute.
    #[error("Dataset '{dataset}' is corrupt: {file} failed: {message}")]
    DatasetCorrupt {
        dataset: String,
        file: &'static str,
        message: String,
    },

    /// The lesson's reference solution query failed to execute.
    #[error("The solution query failed: {0}")]
    LessonSolutionInvalid(String),

    /// The lesson's state validation query failed or returned no result set.
    #[error("The validation query failed: {0}")]
    LessonValidationQueryInvalid(String),

    /// The lesson names a validation type the engine does not know.
    #[error("Unknown validation type '{0}' in lesson file")]
    UnknownValidationType(String),

    /// A field required by the lesson's validation type is absent.
    #[error("Lesson is missing '{0}' required by its validation type")]
    LessonIncomplete(&'static str),

    /// Course content errors (missing manifest, unparsable module file, etc.)
    #[error("Content error: {0}")]
    Content(String),

    /// Sandbox plumbing errors unrelated to the dataset contents.
    #[error("Sandbox error: {0}")]
    Sandbox(String),

    /// Progress file errors.
    #[error("Progress error: {0}")]
    Progress(String),

    /// Configuration errors (invalid config file, bad paths, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Terminal I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SqleanError {
    /// Creates a content error with the given message.
    pub fn content(msg: impl Into<String>) -> Self {
        Self::Content(msg.into())
    }

    /// Creates a sandbox error with the given message.
    pub fn sandbox(msg: impl Into<String>) -> Self {
        Self::Sandbox(msg.into())
    }

    /// Creates a progress error with the given message.
    pub fn progress(msg: impl Into<String>) -> Self {
        Self::Progress(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns true when the error points at broken lesson content rather
    /// than at the tutor itself.
    pub fn is_authoring(&self) -> bool {
        matches!(
            self,
            Self::DatasetNotFound { .. }
                | Self::DatasetCorrupt { .. }
                | Self::LessonSolutionInvalid(_)
                | Self::LessonValidationQueryInvalid(_)
                | Self::UnknownValidationType(_)
                | Self::LessonIncomplete(_)
                | Self::Content(_)
        )
    }

    /// Fixed text shown to the learner when a lesson cannot be graded.
    pub fn learner_message(&self) -> String {
        match self {
            Self::DatasetNotFound { .. } | Self::DatasetCorrupt { .. } => {
                "Error: Could not load dataset for validation.".to_string()
            }
            Self::UnknownValidationType(_) => {
                "Error: Unknown validation type in lesson file.".to_string()
            }
            other => format!("Lesson Error: {other}"),
        }
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::DatasetNotFound { .. } | Self::DatasetCorrupt { .. } => "Dataset Error",
            Self::LessonSolutionInvalid(_)
            | Self::LessonValidationQueryInvalid(_)
            | Self::UnknownValidationType(_)
            | Self::LessonIncomplete(_) => "Lesson Error",
            Self::Content(_) => "Content Error",
            Self::Sandbox(_) => "Sandbox Error",
            Self::Progress(_) => "Progress Error",
            Self::Config(_) => "Configuration Error",
            Self::Io(_) => "I/O Error",
        }
    }
}

/// Result type alias using SqleanError.
pub type Result<T> = std::result::Result<T, SqleanError>;
