//! Core domain logic for the reminder scheduler.
//! This crate is the single source of truth for task invariants: recurrence,
//! validation, search routing and completion.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod recurrence;
pub mod repo;
pub mod search;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use logging::{default_log_level, init_logging, init_stderr_logging, logging_status, LogSink};
pub use model::task::{
    format_storage_date, parse_search_date, parse_storage_date, Task, TaskId, DATE_FORMAT,
    SEARCH_DATE_FORMAT,
};
pub use recurrence::{
    next_occurrence, next_occurrence_string, DateRule, RecurrenceError, RecurrenceResult,
    RuleDefect, MAX_INTERVAL_DAYS,
};
pub use repo::task_repo::{RepoError, RepoResult, SqliteTaskRepository, TaskRepository};
pub use search::classify::{classify, SearchTerm};
pub use service::completion::{complete_task, CompletionAction};
pub use service::task_service::{ServiceResult, TaskService, TaskServiceError, TASK_LIST_LIMIT};
pub use service::validation::{validate_task, TaskValidationError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
