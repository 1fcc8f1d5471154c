//! SQLean - an interactive SQL tutor.
//!
//! Lessons are graded by running the learner's statement against a fresh
//! in-memory SQLite sandbox built from the lesson's dataset. The library
//! exposes the core modules for the binary and for integration tests.

pub mod check;
pub mod cli;
pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod history;
pub mod logging;
pub mod progress;
pub mod tutor;
pub mod validation;
