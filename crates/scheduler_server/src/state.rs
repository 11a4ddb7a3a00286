//! Shared request state.
//!
//! # Invariants
//! - One SQLite connection is shared; each request holds its lock for the
//!   whole use-case, so repository calls within a request never interleave
//!   with another request's.

use crate::error::ApiError;
use rusqlite::Connection;
use scheduler_core::{ServiceResult, SqliteTaskRepository, SystemClock, TaskService};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
    password: Option<Arc<str>>,
}

impl AppState {
    /// Wraps a migrated connection. `password = None` disables auth.
    pub fn new(conn: Connection, password: Option<String>) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            password: password.map(Arc::from),
        }
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Runs `f` against a task service on the blocking pool.
    ///
    /// `operation` names the use-case in logs when storage fails.
    pub async fn with_task_service<T, F>(&self, operation: &'static str, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&TaskService<SqliteTaskRepository<'_>, SystemClock>) -> ServiceResult<T>
            + Send
            + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let conn = db
                .lock()
                .map_err(|_| ApiError::internal(operation, "database lock poisoned"))?;
            let repo = SqliteTaskRepository::try_new(&conn)
                .map_err(|err| ApiError::internal(operation, err))?;
            let service = TaskService::new(repo, SystemClock);
            f(&service).map_err(|err| ApiError::from_service(operation, err))
        })
        .await
        .map_err(|err| ApiError::internal(operation, err))?
    }
}
