//! Submitted-statement history, kept next to the progress file.
//!
//! One statement per line, oldest first. The file is appended to as
//! statements are submitted and trimmed to the newest entries when loaded.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Entries kept on disk and in memory.
pub const MAX_HISTORY_SIZE: usize = 500;

/// File name of the history file, placed beside the progress file.
pub const HISTORY_FILE: &str = "sql_history";

/// Returns the history file that belongs with a progress file.
pub fn history_path_for(progress_file: &Path) -> PathBuf {
    progress_file.with_file_name(HISTORY_FILE)
}

/// Statements the learner has submitted, oldest first.
#[derive(Debug, Default)]
pub struct InputHistory {
    /// Backing file; `None` keeps the history in memory only.
    path: Option<PathBuf>,
    entries: Vec<String>,
}

impl InputHistory {
    /// Creates a history that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads the history file. A missing or unreadable file starts empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut entries: Vec<String> = match std::fs::read_to_string(&path) {
            Ok(content) => content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!("Could not read history {}: {e}", path.display());
                Vec::new()
            }
        };

        let mut history = Self {
            path: Some(path),
            entries: Vec::new(),
        };

        if entries.len() > MAX_HISTORY_SIZE {
            entries.drain(..entries.len() - MAX_HISTORY_SIZE);
            history.entries = entries;
            history.rewrite();
        } else {
            history.entries = entries;
        }

        debug!("Loaded {} history entries", history.entries.len());
        history
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// The newest `count` entries, oldest first.
    pub fn recent(&self, count: usize) -> &[String] {
        let start = self.entries.len().saturating_sub(count);
        &self.entries[start..]
    }

    /// Records a submitted statement.
    ///
    /// Skips empty statements and repeats of the newest entry. A failed write
    /// is logged and the entry is still kept for this session.
    pub fn record(&mut self, statement: &str) {
        let entry = statement.split_whitespace().collect::<Vec<_>>().join(" ");
        if entry.is_empty() {
            return;
        }
        if self.entries.last() == Some(&entry) {
            return;
        }

        if let Some(path) = &self.path {
            if let Err(e) = append_line(path, &entry) {
                warn!("Could not write history {}: {e}", path.display());
            }
        }

        self.entries.push(entry);
        if self.entries.len() > MAX_HISTORY_SIZE {
            self.entries.remove(0);
        }
    }

    /// Replaces the file with the in-memory entries.
    fn rewrite(&self) {
        let Some(path) = &self.path else {
            return;
        };

        let mut content = self.entries.join("\n");
        content.push('\n');
        if let Err(e) = std::fs::write(path, content) {
            warn!("Could not trim history {}: {e}", path.display());
        }
    }
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")
}
