//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and listing APIs over the `scheduler` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Ids are SQLite rowids exposed as decimal strings; a non-numeric id
//!   addresses no row.
//! - Listings are ordered by `date ASC, id ASC` and bounded by the caller's limit.
//! - Text matching is case-sensitive (`instr`, not `LIKE`).
//! - Read paths reject rows whose `date` is not `YYYYMMDD`.

use crate::db::{schema_state, DbError, SchemaState};
use crate::model::task::{parse_storage_date, Task, TaskId};
use rusqlite::{params, Connection, Params, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    date,
    title,
    comment,
    repeat
FROM scheduler";

const TASK_ORDER_SQL: &str = "ORDER BY date ASC, id ASC LIMIT ?";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for task persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Connection was handed over before migrations ran.
    SchemaNotReady { found: u32, expected: u32 },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::SchemaNotReady { found, expected } => write!(
                f,
                "database schema version {found} does not match expected {expected}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::SchemaNotReady { .. } | Self::InvalidData(_) => None,
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

/// Persistence contract for tasks.
pub trait TaskRepository {
    /// Inserts a task, ignoring `task.id`, and returns the assigned id.
    fn insert_task(&self, task: &Task) -> RepoResult<TaskId>;
    fn get_task(&self, id: &TaskId) -> RepoResult<Option<Task>>;
    /// Lists tasks without filtering.
    fn list_tasks(&self, limit: u32) -> RepoResult<Vec<Task>>;
    /// Lists tasks whose `date` equals `date` (`YYYYMMDD`).
    fn list_tasks_by_date(&self, date: &str, limit: u32) -> RepoResult<Vec<Task>>;
    /// Lists tasks whose title or comment contains `fragment`.
    fn list_tasks_by_text(&self, fragment: &str, limit: u32) -> RepoResult<Vec<Task>>;
    /// Replaces all fields of the row addressed by `task.id`.
    fn update_task(&self, task: &Task) -> RepoResult<usize>;
    fn delete_task(&self, id: &TaskId) -> RepoResult<usize>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `SchemaNotReady` when the connection has not been migrated.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        match schema_state(conn)? {
            SchemaState::Current => Ok(Self { conn }),
            SchemaState::Behind { found, latest } | SchemaState::TooNew { found, latest } => {
                Err(RepoError::SchemaNotReady {
                    found,
                    expected: latest,
                })
            }
        }
    }

    fn query_tasks(&self, filter_sql: &str, params: impl Params) -> RepoResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} {filter_sql} {TASK_ORDER_SQL};"))?;
        let mut rows = stmt.query(params)?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn insert_task(&self, task: &Task) -> RepoResult<TaskId> {
        self.conn.execute(
            "INSERT INTO scheduler (date, title, comment, repeat)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                task.date.as_str(),
                task.title.as_str(),
                task.comment.as_str(),
                task.repeat.as_str(),
            ],
        )?;

        Ok(TaskId::from(self.conn.last_insert_rowid()))
    }

    fn get_task(&self, id: &TaskId) -> RepoResult<Option<Task>> {
        let Some(row_id) = row_id(id) else {
            return Ok(None);
        };

        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([row_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn list_tasks(&self, limit: u32) -> RepoResult<Vec<Task>> {
        self.query_tasks("", params![i64::from(limit)])
    }

    fn list_tasks_by_date(&self, date: &str, limit: u32) -> RepoResult<Vec<Task>> {
        self.query_tasks("WHERE date = ?", params![date, i64::from(limit)])
    }

    fn list_tasks_by_text(&self, fragment: &str, limit: u32) -> RepoResult<Vec<Task>> {
        self.query_tasks(
            "WHERE instr(title, ?1) > 0 OR instr(comment, ?1) > 0",
            params![fragment, i64::from(limit)],
        )
    }

    fn update_task(&self, task: &Task) -> RepoResult<usize> {
        let Some(row_id) = row_id(&task.id) else {
            return Ok(0);
        };

        let changed = self.conn.execute(
            "UPDATE scheduler
             SET
                date = ?1,
                title = ?2,
                comment = ?3,
                repeat = ?4
             WHERE id = ?5;",
            params![
                task.date.as_str(),
                task.title.as_str(),
                task.comment.as_str(),
                task.repeat.as_str(),
                row_id,
            ],
        )?;

        Ok(changed)
    }

    fn delete_task(&self, id: &TaskId) -> RepoResult<usize> {
        let Some(row_id) = row_id(id) else {
            return Ok(0);
        };

        let changed = self
            .conn
            .execute("DELETE FROM scheduler WHERE id = ?1;", [row_id])?;
        Ok(changed)
    }
}

fn row_id(id: &TaskId) -> Option<i64> {
    id.as_str().trim().parse().ok()
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id: i64 = row.get("id")?;
    let date: String = row.get("date")?;
    if parse_storage_date(&date).is_none() {
        return Err(RepoError::InvalidData(format!(
            "invalid date `{date}` in scheduler.date for id {id}"
        )));
    }

    Ok(Task {
        id: TaskId::from(id),
        date,
        title: row.get("title")?,
        comment: row.get("comment")?,
        repeat: row.get("repeat")?,
    })
}
