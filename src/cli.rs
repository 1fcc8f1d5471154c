//! Command-line argument parsing for SQLean.

use crate::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// An interactive SQL tutor with sandboxed exercises.
#[derive(Parser, Debug)]
#[command(name = "sqlean")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Course content directory (holds manifest.yml)
    #[arg(long = "content", value_name = "DIR", env = "SQLEAN_CONTENT")]
    pub content_dir: Option<PathBuf>,

    /// Datasets directory (one sub-directory per dataset)
    #[arg(long = "datasets", value_name = "DIR", env = "SQLEAN_DATASETS")]
    pub datasets_dir: Option<PathBuf>,

    /// Progress file
    #[arg(long = "progress", value_name = "FILE")]
    pub progress_file: Option<PathBuf>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Grade every lesson's own solution to find broken lessons
    Check,

    /// Print the schema of a dataset
    Schema {
        /// Dataset name, e.g. employees_db
        dataset: String,
    },

    /// Forget saved progress and start the course over
    Reset,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Applies command-line overrides on top of the file configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(dir) = &self.content_dir {
            config.paths.content_dir = dir.clone();
        }
        if let Some(dir) = &self.datasets_dir {
            config.paths.datasets_dir = dir.clone();
        }
        if let Some(file) = &self.progress_file {
            config.paths.progress_file = file.clone();
        }
        if self.no_color {
            config.display.color = false;
        }
    }

    /// Returns true when the interactive tutor should run.
    pub fn is_interactive(&self) -> bool {
        self.command.is_none()
    }
}
