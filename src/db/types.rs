//! Query result types for SQLean.
//!
//! Defines the structures used to represent what a sandbox returns for a
//! single statement.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// The outcome of executing exactly one statement against a sandbox.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// The statement produced a relation.
    Rows(TabularResult),

    /// The statement changed data (or schema) and produced no relation.
    Mutation { rows_affected: u64 },

    /// The engine rejected the statement. Carries SQLite's own message.
    Failed(String),
}

impl QueryOutcome {
    /// Returns true unless the engine rejected the statement.
    pub fn is_ok(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    /// Returns the tabular payload, if any.
    pub fn tabular(&self) -> Option<&TabularResult> {
        match self {
            Self::Rows(result) => Some(result),
            _ => None,
        }
    }

    /// Consumes the outcome, keeping only a tabular payload.
    pub fn into_tabular(self) -> Option<TabularResult> {
        match self {
            Self::Rows(result) => Some(result),
            _ => None,
        }
    }

    /// Returns the rows of a tabular outcome; other outcomes have none.
    pub fn rows(&self) -> &[Row] {
        match self {
            Self::Rows(result) => &result.rows,
            _ => &[],
        }
    }

    /// Returns the engine error text for a failed outcome.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Columns and rows returned by a read statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularResult {
    /// Column metadata, in the order the engine reported it.
    pub columns: Vec<ColumnInfo>,

    /// Rows of data, in the order the engine returned them.
    pub rows: Vec<Row>,

    /// Time taken to execute the statement.
    pub execution_time: Duration,
}

impl TabularResult {
    /// Creates a result with the given columns and rows.
    pub fn with_data(columns: Vec<ColumnInfo>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows,
            execution_time: Duration::ZERO,
        }
    }

    /// Sets the execution time.
    pub fn with_execution_time(mut self, duration: Duration) -> Self {
        self.execution_time = duration;
        self
    }

    /// Number of rows in the result.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the result set is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in result order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Metadata about a column in a result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnInfo {
    /// Column name (or alias).
    pub name: String,

    /// Declared type, as SQLite reports it. Expressions report `NULL`.
    pub data_type: String,
}

impl ColumnInfo {
    /// Creates a new column info with the given name and type.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// A row of data from a query result.
pub type Row = Vec<Value>;

/// A single scalar value.
///
/// Untagged so that lesson files can write `expected_results` as plain YAML
/// scalars (`[[1, "shipped", null]]`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    /// NULL value.
    #[default]
    Null,

    /// Boolean value. SQLite stores these as integers; only lesson files
    /// produce this variant.
    Bool(bool),

    /// Signed integer (SQLite INTEGER).
    Int(i64),

    /// Floating point number (SQLite REAL).
    Float(f64),

    /// Text value (SQLite TEXT).
    String(String),

    /// Binary data (SQLite BLOB).
    Bytes(Vec<u8>),
}

impl Value {
    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Converts the value to its display representation.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::String(s) => s.clone(),
            Value::Bytes(b) => format!("<{} bytes>", b.len()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}
