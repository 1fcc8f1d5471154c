//! Sandboxed database layer for SQLean.
//!
//! Datasets live on disk as a `schema.sql` + `data.sql` pair. Each exercise
//! attempt gets its own in-memory SQLite sandbox built from those files.

mod sandbox;
mod statement;
mod types;

pub use sandbox::{DatasetStore, Sandbox, DATA_FILE, SCHEMA_FILE};
pub use statement::{statement_count, MULTIPLE_STATEMENTS};
pub use types::{ColumnInfo, QueryOutcome, Row, TabularResult, Value};
