//! Snapshot repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist and rehydrate the whole task sequence as one JSON slot value.
//! - Keep SQL and JSON codec details inside the persistence boundary.
//!
//! # Invariants
//! - `tasks` and `next_id` are written together in one transaction.
//! - Read paths reject malformed persisted state instead of masking it.
//! - The `tasks` slot value stays a plain JSON array of task objects.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::task::{Task, TaskId};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot key holding the JSON array of tasks.
pub const TASKS_SLOT: &str = "tasks";
/// Slot key holding the next counter id as a JSON number.
pub const NEXT_ID_SLOT: &str = "next_id";

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence-layer error for slot load/save operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Slot value does not encode/decode to the expected shape.
    InvalidData {
        slot: &'static str,
        message: String,
    },
    /// Connection schema is not at the migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing from the connection's schema.
    MissingRequiredTable(&'static str),
    /// Required column is missing from an existing table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData { slot, message } => {
                write!(f, "invalid `{slot}` slot value: {message}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection not migrated: schema version {actual_version}, expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Raw stored snapshot, before store-level policy is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSnapshot {
    /// Task sequence in display order at last save.
    pub tasks: Vec<Task>,
    /// Persisted counter value; `None` for legacy snapshots without one.
    pub next_id: Option<TaskId>,
}

/// Repository interface for whole-snapshot persistence.
pub trait SnapshotRepository {
    /// Loads the stored snapshot, or `None` when no snapshot was ever saved.
    fn load_snapshot(&self) -> RepoResult<Option<StoredSnapshot>>;
    /// Overwrites the snapshot: full task sequence plus counter, atomically.
    fn save_snapshot(&mut self, tasks: &[Task], next_id: TaskId) -> RepoResult<()>;
}

/// SQLite-backed snapshot repository over the `slots` table.
pub struct SqliteSnapshotRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteSnapshotRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not run.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not match this binary's expectations.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl SnapshotRepository for SqliteSnapshotRepository<'_> {
    fn load_snapshot(&self) -> RepoResult<Option<StoredSnapshot>> {
        let Some(tasks_json) = read_slot(self.conn, TASKS_SLOT)? else {
            return Ok(None);
        };
        let tasks: Vec<Task> =
            serde_json::from_str(&tasks_json).map_err(|err| RepoError::InvalidData {
                slot: TASKS_SLOT,
                message: err.to_string(),
            })?;

        let next_id = match read_slot(self.conn, NEXT_ID_SLOT)? {
            Some(raw) => Some(serde_json::from_str::<TaskId>(&raw).map_err(|err| {
                RepoError::InvalidData {
                    slot: NEXT_ID_SLOT,
                    message: err.to_string(),
                }
            })?),
            None => None,
        };

        Ok(Some(StoredSnapshot { tasks, next_id }))
    }

    fn save_snapshot(&mut self, tasks: &[Task], next_id: TaskId) -> RepoResult<()> {
        let tasks_json =
            serde_json::to_string(tasks).map_err(|err| RepoError::InvalidData {
                slot: TASKS_SLOT,
                message: err.to_string(),
            })?;

        let tx = self.conn.transaction()?;
        write_slot(&tx, TASKS_SLOT, &tasks_json)?;
        write_slot(&tx, NEXT_ID_SLOT, &next_id.to_string())?;
        tx.commit()?;

        Ok(())
    }
}

fn read_slot(conn: &Connection, key: &str) -> RepoResult<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM slots WHERE key = ?1;", [key], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(value)
}

fn write_slot(conn: &Connection, key: &str, value: &str) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO slots (key, value, updated_at)
         VALUES (?1, ?2, strftime('%s', 'now') * 1000)
         ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at;",
        params![key, value],
    )?;
    Ok(())
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected = latest_version();
    let actual: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual != expected {
        return Err(RepoError::UninitializedConnection {
            expected_version: expected,
            actual_version: actual,
        });
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('slots');")?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>(0)?);
    }

    if columns.is_empty() {
        return Err(RepoError::MissingRequiredTable("slots"));
    }
    for required in ["key", "value", "updated_at"] {
        if !columns.iter().any(|name| name == required) {
            return Err(RepoError::MissingRequiredColumn {
                table: "slots",
                column: required,
            });
        }
    }

    Ok(())
}
