//! Learner progress, stored as a small JSON file.

use crate::content::LessonRef;
use crate::error::{Result, SqleanError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Where the learner is and what they have finished.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Module of the lesson to resume at. `None` means the start of the course.
    #[serde(default)]
    pub last_module_id: Option<String>,

    #[serde(default)]
    pub last_lesson_id: Option<u32>,

    /// Completed lesson ids per module, in completion order.
    #[serde(default)]
    pub completed_lessons: BTreeMap<String, Vec<u32>>,
}

impl Progress {
    /// The lesson to resume at, if one was recorded.
    pub fn current(&self) -> Option<LessonRef> {
        match (&self.last_module_id, self.last_lesson_id) {
            (Some(module), Some(lesson)) => Some(LessonRef::new(module, lesson)),
            _ => None,
        }
    }

    /// Moves the current position, marking the lesson completed if asked.
    pub fn record(&mut self, at: &LessonRef, completed: bool) {
        self.last_module_id = Some(at.module_id.clone());
        self.last_lesson_id = Some(at.lesson_id);

        if completed {
            let done = self
                .completed_lessons
                .entry(at.module_id.clone())
                .or_default();
            if !done.contains(&at.lesson_id) {
                done.push(at.lesson_id);
            }
        }
    }

    /// Returns true if the lesson has been completed.
    pub fn is_completed(&self, at: &LessonRef) -> bool {
        self.completed_lessons
            .get(&at.module_id)
            .is_some_and(|done| done.contains(&at.lesson_id))
    }

    /// Total number of completed lessons.
    pub fn completed_count(&self) -> usize {
        self.completed_lessons.values().map(Vec::len).sum()
    }
}

/// Reads and writes [`Progress`] at a fixed path.
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads progress. A missing file gives default progress, and so does a
    /// corrupted one (with a warning).
    pub fn load(&self) -> Progress {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return Progress::default(),
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(
                "{} is corrupted ({e}). Starting from scratch.",
                self.path.display()
            );
            Progress::default()
        })
    }

    /// Writes progress, creating parent directories as needed.
    pub fn save(&self, progress: &Progress) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SqleanError::progress(format!(
                    "Failed to create directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let json = serde_json::to_string_pretty(progress)
            .map_err(|e| SqleanError::progress(format!("Failed to serialize progress: {e}")))?;

        std::fs::write(&self.path, json).map_err(|e| {
            SqleanError::progress(format!("Error saving progress to {}: {e}", self.path.display()))
        })
    }

    /// Loads, records a position change, and saves.
    pub fn record(&self, at: &LessonRef, completed: bool) -> Result<Progress> {
        let mut progress = self.load();
        progress.record(at, completed);
        self.save(&progress)?;
        Ok(progress)
    }

    /// Deletes the progress file. Succeeds if there is nothing to delete.
    pub fn reset(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Removed progress file {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SqleanError::progress(format!(
                "Failed to remove {}: {e}",
                self.path.display()
            ))),
        }
    }
}
