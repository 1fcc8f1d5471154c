//! In-memory SQLite sandboxes built from dataset files.
//!
//! Every call to [`DatasetStore::provision`] opens a brand-new private
//! `:memory:` connection, so two sandboxes never see each other's changes.

use crate::db::{
    statement_count, ColumnInfo, QueryOutcome, Row, TabularResult, Value, MULTIPLE_STATEMENTS,
};
use crate::error::{Result, SqleanError};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Column as _, Connection, Executor, Row as _, Statement, TypeInfo, ValueRef};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;
use tracing::{debug, warn};

/// File holding a dataset's DDL.
pub const SCHEMA_FILE: &str = "schema.sql";

/// File holding a dataset's seed DML.
pub const DATA_FILE: &str = "data.sql";

/// Resolves dataset names to their files and provisions sandboxes from them.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    root: PathBuf,
}

impl DatasetStore {
    /// Creates a store rooted at the given datasets directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the directory for a dataset name.
    pub fn dataset_dir(&self, dataset: &str) -> PathBuf {
        self.root.join(dataset)
    }

    /// Reads both dataset files, failing if either is missing.
    fn read_dataset(&self, dataset: &str) -> Result<(String, String)> {
        let dir = self.dataset_dir(dataset);
        let schema_path = dir.join(SCHEMA_FILE);
        let data_path = dir.join(DATA_FILE);

        if !(schema_path.is_file() && data_path.is_file()) {
            return Err(SqleanError::DatasetNotFound {
                dataset: dataset.to_string(),
                path: dir,
            });
        }

        let read = |path: &Path| {
            std::fs::read_to_string(path).map_err(|_| SqleanError::DatasetNotFound {
                dataset: dataset.to_string(),
                path: path.to_path_buf(),
            })
        };

        Ok((read(&schema_path)?, read(&data_path)?))
    }

    /// Builds a fresh sandbox populated from the dataset's schema and seed.
    pub async fn provision(&self, dataset: &str) -> Result<Sandbox> {
        let (schema_sql, data_sql) = self.read_dataset(dataset)?;

        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| SqleanError::sandbox(format!("Invalid sandbox options: {e}")))?
            .foreign_keys(false);

        let mut conn = SqliteConnection::connect_with(&options)
            .await
            .map_err(|e| SqleanError::sandbox(format!("Failed to open sandbox: {e}")))?;

        for (file, script) in [(SCHEMA_FILE, &schema_sql), (DATA_FILE, &data_sql)] {
            if let Err(e) = sqlx::raw_sql(script).execute(&mut conn).await {
                let message = engine_message(&e);
                if let Err(close_err) = conn.close().await {
                    warn!("Failed to close discarded sandbox for '{dataset}': {close_err}");
                }
                return Err(SqleanError::DatasetCorrupt {
                    dataset: dataset.to_string(),
                    file,
                    message,
                });
            }
        }

        debug!("Provisioned sandbox for dataset '{dataset}'");
        Ok(Sandbox {
            dataset: dataset.to_string(),
            conn,
        })
    }

    /// Returns the formatted table DDL of a freshly provisioned sandbox.
    pub async fn schema_text(&self, dataset: &str) -> Result<String> {
        let mut sandbox = self.provision(dataset).await?;
        let text = sandbox.schema_text().await;
        sandbox.close().await;
        text
    }
}

/// An ephemeral, private database populated from one dataset.
///
/// Dropping a sandbox releases its connection; [`Sandbox::close`] does the
/// same but waits for the shutdown to finish.
#[derive(Debug)]
pub struct Sandbox {
    dataset: String,
    conn: SqliteConnection,
}

impl Sandbox {
    /// Executes one statement.
    ///
    /// Engine rejections come back as [`QueryOutcome::Failed`] with SQLite's
    /// message untouched. Text holding more than one statement is refused
    /// before anything runs. Nothing is retried.
    pub async fn execute(&mut self, sql: &str) -> QueryOutcome {
        if statement_count(sql).is_some_and(|n| n > 1) {
            debug!("Refused multi-statement input");
            return QueryOutcome::Failed(MULTIPLE_STATEMENTS.to_string());
        }

        let start = Instant::now();

        let statement = match (&mut self.conn).prepare(sql).await {
            Ok(statement) => statement,
            Err(e) => return QueryOutcome::Failed(engine_message(&e)),
        };

        let columns: Vec<ColumnInfo> = statement
            .columns()
            .iter()
            .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
            .collect();

        if columns.is_empty() {
            return match statement.query().execute(&mut self.conn).await {
                Ok(done) => {
                    debug!("Mutation affected {} row(s)", done.rows_affected());
                    QueryOutcome::Mutation {
                        rows_affected: done.rows_affected(),
                    }
                }
                Err(e) => QueryOutcome::Failed(engine_message(&e)),
            };
        }

        match statement.query().fetch_all(&mut self.conn).await {
            Ok(rows) => {
                let rows: Vec<Row> = rows.iter().map(convert_row).collect();
                QueryOutcome::Rows(
                    TabularResult::with_data(columns, rows).with_execution_time(start.elapsed()),
                )
            }
            Err(e) => QueryOutcome::Failed(engine_message(&e)),
        }
    }

    /// Formats every user table's `CREATE` statement.
    pub async fn schema_text(&mut self) -> Result<String> {
        let tables: Vec<(String, String)> = sqlx::query_as(
            "SELECT name, sql FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY rowid",
        )
        .fetch_all(&mut self.conn)
        .await
        .map_err(|e| SqleanError::sandbox(format!("Error retrieving schema: {e}")))?;

        Ok(format_schema(&tables))
    }

    /// Closes the connection.
    pub async fn close(self) {
        if let Err(e) = self.conn.close().await {
            warn!("Failed to close sandbox for '{}': {e}", self.dataset);
        }
    }
}

/// Formats `(table, ddl)` pairs for the learner-facing schema view.
pub(crate) fn format_schema(tables: &[(String, String)]) -> String {
    if tables.is_empty() {
        return "No tables found in this database.".to_string();
    }

    let blocks = tables
        .iter()
        .map(|(name, sql)| format!("-- {name} --\n{sql};"))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("--- DATABASE SCHEMA ---\n\n{blocks}")
}

/// Extracts SQLite's own message from a sqlx error.
fn engine_message(error: &sqlx::Error) -> String {
    match error.as_database_error() {
        Some(db_error) => db_error.message().to_string(),
        None => error.to_string(),
    }
}

/// Converts a sqlx SqliteRow to our Row type.
fn convert_row(row: &SqliteRow) -> Row {
    (0..row.len()).map(|i| convert_value(row, i)).collect()
}

/// Converts one column using the value's runtime storage class.
///
/// SQLite is dynamically typed, so the declared column type says little about
/// what a given cell actually holds.
fn convert_value(row: &SqliteRow, index: usize) -> Value {
    let storage_class = match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw.type_info().name().to_uppercase(),
        Err(_) => return Value::Null,
    };

    match storage_class.as_str() {
        "INTEGER" => row
            .try_get_unchecked::<i64, _>(index)
            .map(Value::Int)
            .unwrap_or(Value::Null),

        "REAL" => row
            .try_get_unchecked::<f64, _>(index)
            .map(Value::Float)
            .unwrap_or(Value::Null),

        "BLOB" => row
            .try_get_unchecked::<Vec<u8>, _>(index)
            .map(Value::Bytes)
            .unwrap_or(Value::Null),

        _ => row
            .try_get_unchecked::<String, _>(index)
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}
