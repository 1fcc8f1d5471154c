//! Course content for SQLean.
//!
//! Loads `manifest.yml` and every module file it references once, up front,
//! and answers lesson lookups from memory.

mod lesson;

pub use lesson::{Lesson, LessonSpec, Manifest, ModuleFile, ModuleInfo};

use crate::error::{Result, SqleanError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Name of the manifest inside the content directory.
pub const MANIFEST_FILE: &str = "manifest.yml";

/// Identifies one lesson within the course.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LessonRef {
    pub module_id: String,
    pub lesson_id: u32,
}

impl LessonRef {
    pub fn new(module_id: impl Into<String>, lesson_id: u32) -> Self {
        Self {
            module_id: module_id.into(),
            lesson_id,
        }
    }
}

impl std::fmt::Display for LessonRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.module_id, self.lesson_id)
    }
}

/// A fully loaded course.
#[derive(Debug, Clone)]
pub struct Course {
    root: PathBuf,
    manifest: Manifest,
    modules: HashMap<String, ModuleFile>,
}

impl Course {
    /// Loads the manifest and all module files from a content directory.
    pub fn load(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let manifest: Manifest = read_yaml(&root.join(MANIFEST_FILE))?;

        let mut modules = HashMap::with_capacity(manifest.modules.len());
        for module in &manifest.modules {
            let file: ModuleFile = read_yaml(&root.join(&module.file))?;
            modules.insert(module.id.clone(), file);
        }

        info!(
            "Loaded course '{}' with {} module(s) from {}",
            manifest.title,
            manifest.modules.len(),
            root.display()
        );

        Ok(Self {
            root,
            manifest,
            modules,
        })
    }

    /// The content directory this course was loaded from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Course title.
    pub fn title(&self) -> &str {
        &self.manifest.title
    }

    /// Modules in manifest order.
    pub fn modules(&self) -> &[ModuleInfo] {
        &self.manifest.modules
    }

    /// Looks up a module's manifest entry.
    pub fn module(&self, module_id: &str) -> Option<&ModuleInfo> {
        self.manifest.modules.iter().find(|m| m.id == module_id)
    }

    /// Lessons of a module in file order.
    pub fn lessons(&self, module_id: &str) -> &[Lesson] {
        self.modules
            .get(module_id)
            .map(|m| m.lessons.as_slice())
            .unwrap_or_default()
    }

    /// Looks up a single lesson.
    pub fn lesson(&self, module_id: &str, lesson_id: u32) -> Option<&Lesson> {
        self.lessons(module_id).iter().find(|l| l.id == lesson_id)
    }

    /// Looks up a lesson together with its module, or fails with a content error.
    pub fn resolve(&self, at: &LessonRef) -> Result<(&ModuleInfo, &Lesson)> {
        let module = self
            .module(&at.module_id)
            .ok_or_else(|| SqleanError::content(format!("Module '{}' not found", at.module_id)))?;
        let lesson = self.lesson(&at.module_id, at.lesson_id).ok_or_else(|| {
            SqleanError::content(format!(
                "Lesson ID {} not found in module {}",
                at.lesson_id, at.module_id
            ))
        })?;
        Ok((module, lesson))
    }

    /// The first lesson of the first non-empty module.
    pub fn first_lesson(&self) -> Option<LessonRef> {
        self.manifest.modules.iter().find_map(|module| {
            self.lessons(&module.id)
                .first()
                .map(|l| LessonRef::new(&module.id, l.id))
        })
    }

    /// The lesson after `current`, crossing into later modules as needed.
    ///
    /// Within a module this is the first lesson, in file order, whose id is
    /// greater than the current one. Returns `None` at the end of the course.
    pub fn next_lesson(&self, current: &LessonRef) -> Option<LessonRef> {
        if let Some(next) = self
            .lessons(&current.module_id)
            .iter()
            .find(|l| l.id > current.lesson_id)
        {
            return Some(LessonRef::new(&current.module_id, next.id));
        }

        let position = self
            .manifest
            .modules
            .iter()
            .position(|m| m.id == current.module_id)?;

        self.manifest.modules[position + 1..]
            .iter()
            .find_map(|module| {
                self.lessons(&module.id)
                    .first()
                    .map(|l| LessonRef::new(&module.id, l.id))
            })
    }

    /// Every lesson in teaching order, paired with its module.
    pub fn all_lessons(&self) -> impl Iterator<Item = (&ModuleInfo, &Lesson)> {
        self.manifest
            .modules
            .iter()
            .flat_map(move |module| self.lessons(&module.id).iter().map(move |l| (module, l)))
    }
}

/// Reads and parses one YAML content file.
fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        SqleanError::content(format!("Failed to read {}: {e}", path.display()))
    })?;

    serde_yaml::from_str(&content)
        .map_err(|e| SqleanError::content(format!("Error parsing {}:\n  {e}", path.display())))
}
