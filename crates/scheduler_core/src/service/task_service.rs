//! Task use-case service.
//!
//! # Responsibility
//! - Provide create/get/list/update/complete/delete entry points.
//! - Route list queries through the search classifier.
//! - Map "zero rows affected" to `NotFound`.
//!
//! # Invariants
//! - Every write goes through `validate_task` first, except completion which
//!   only rewrites `date`.
//! - Repository and clock are injected; the service holds no other state.

use crate::clock::Clock;
use crate::model::task::{Task, TaskId};
use crate::recurrence::RecurrenceError;
use crate::repo::task_repo::{RepoError, TaskRepository};
use crate::search::classify::{classify, SearchTerm};
use crate::service::completion::{complete_task, CompletionAction};
use crate::service::validation::{validate_task, TaskValidationError};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum number of rows returned by any listing.
pub const TASK_LIST_LIMIT: u32 = 50;

pub type ServiceResult<T> = Result<T, TaskServiceError>;

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    Validation(TaskValidationError),
    /// Stored rule or date could not produce a next occurrence on completion.
    InvalidRepeatRule(RecurrenceError),
    NotFound(TaskId),
    Repo(RepoError),
}

impl TaskServiceError {
    /// Returns whether the error is caused by caller input rather than storage.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Repo(_))
    }
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidRepeatRule(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::InvalidRepeatRule(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for TaskServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Task service facade over repository and clock implementations.
pub struct TaskService<R: TaskRepository, C: Clock> {
    repo: R,
    clock: C,
}

impl<R: TaskRepository, C: Clock> TaskService<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Validates and stores a new task. Any client-supplied id is ignored.
    pub fn create_task(&self, task: Task) -> ServiceResult<TaskId> {
        let task = validate_task(task, &self.clock).inspect_err(|err| {
            debug!("event=task_create module=service status=rejected reason={err}");
        })?;
        let id = self.repo.insert_task(&task)?;
        info!(
            "event=task_create module=service status=ok id={id} date={} recurring={}",
            task.date,
            task.is_recurring()
        );
        Ok(id)
    }

    pub fn get_task(&self, id: &TaskId) -> ServiceResult<Task> {
        self.repo
            .get_task(id)?
            .ok_or_else(|| TaskServiceError::NotFound(id.clone()))
    }

    /// Lists tasks, optionally filtered by a search term.
    ///
    /// - `None` or empty term: unfiltered listing.
    /// - `DD.MM.YYYY`: tasks due exactly on that date.
    /// - anything else: case-sensitive substring of title or comment.
    pub fn list_tasks(&self, search: Option<&str>) -> ServiceResult<Vec<Task>> {
        let tasks = match search.filter(|term| !term.is_empty()).map(classify) {
            None => self.repo.list_tasks(TASK_LIST_LIMIT)?,
            Some(SearchTerm::ExactDate(date)) => {
                self.repo.list_tasks_by_date(&date, TASK_LIST_LIMIT)?
            }
            Some(SearchTerm::TextFragment(fragment)) => {
                self.repo.list_tasks_by_text(&fragment, TASK_LIST_LIMIT)?
            }
        };
        Ok(tasks)
    }

    /// Validates and replaces an existing task, returning the stored version.
    pub fn update_task(&self, task: Task) -> ServiceResult<Task> {
        let task = validate_task(task, &self.clock).inspect_err(|err| {
            debug!("event=task_update module=service status=rejected reason={err}");
        })?;
        if self.repo.update_task(&task)? == 0 {
            return Err(TaskServiceError::NotFound(task.id));
        }
        info!(
            "event=task_update module=service status=ok id={} date={}",
            task.id, task.date
        );
        Ok(task)
    }

    /// Marks a task as done: deletes one-off tasks, advances recurring ones.
    ///
    /// Returns the applied action.
    pub fn complete_task(&self, id: &TaskId) -> ServiceResult<CompletionAction> {
        let task = self.get_task(id)?;
        let action = complete_task(&task, &self.clock).map_err(|err| {
            warn!("event=task_complete module=service status=error id={id} error={err}");
            TaskServiceError::InvalidRepeatRule(err)
        })?;

        let changed = match action.apply(task) {
            None => self.repo.delete_task(id)?,
            Some(updated) => self.repo.update_task(&updated)?,
        };
        if changed == 0 {
            return Err(TaskServiceError::NotFound(id.clone()));
        }

        info!("event=task_complete module=service status=ok id={id} action={action:?}");
        Ok(action)
    }

    pub fn delete_task(&self, id: &TaskId) -> ServiceResult<()> {
        if self.repo.delete_task(id)? == 0 {
            return Err(TaskServiceError::NotFound(id.clone()));
        }
        info!("event=task_delete module=service status=ok id={id}");
        Ok(())
    }
}
