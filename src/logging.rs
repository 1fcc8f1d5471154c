//! Logging setup for SQLean.
//!
//! The tutor owns the terminal while it runs, so its log goes to a file that
//! is truncated at the start of every session. One-shot subcommands such as
//! `check` log to stderr next to their report.

use crate::error::{Result, SqleanError};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Log file name inside the state directory.
pub const LOG_FILE: &str = "sqlean.log";

/// Level used when `RUST_LOG` is unset or invalid.
const DEFAULT_LEVEL: &str = "info";

/// Where log lines are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

impl LogTarget {
    /// The target for a session: a file for the tutor, stderr otherwise.
    pub fn for_session(interactive: bool) -> Self {
        if interactive {
            Self::File(log_path())
        } else {
            Self::Stderr
        }
    }
}

/// Installs the global subscriber for `target`.
///
/// Fails if the log file cannot be created or a subscriber is already set.
pub fn init(target: &LogTarget) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter());

    let installed = match target {
        LogTarget::File(path) => builder
            .with_writer(open_log_file(path)?)
            .with_ansi(false)
            .try_init(),
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|e| SqleanError::config(format!("Could not install logger: {e}")))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Creates (or truncates) the log file and its parent directories.
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}

/// The tutor's log file: the platform state directory, then the local data
/// directory, then the temp directory.
pub fn log_path() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|dir| dir.join("sqlean").join(LOG_FILE))
        .unwrap_or_else(|| std::env::temp_dir().join(LOG_FILE))
}
