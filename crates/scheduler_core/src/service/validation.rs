//! Task payload validation.
//!
//! # Responsibility
//! - Accept or reject a submitted task before create/update.
//! - Normalize the due date (fill empty, collapse past dates to today).
//!
//! # Invariants
//! - Steps run in a fixed order and stop at the first failure.
//! - Only `date` is ever rewritten.
//! - A date at midnight is compared against the full current timestamp, so a
//!   date equal to today is always rewritten to today as well. This matches
//!   the stored behavior clients already depend on.

use crate::clock::Clock;
use crate::model::task::{format_storage_date, parse_storage_date, Task};
use crate::recurrence::{next_occurrence, RecurrenceError};
use chrono::NaiveTime;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejection reasons for a submitted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    MissingTitle,
    InvalidDateFormat(String),
    /// Rule failed the feasibility pre-check.
    InvalidRepeatRule(RecurrenceError),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTitle => f.write_str("title is required"),
            Self::InvalidDateFormat(value) => {
                write!(f, "invalid date format `{value}`: expected YYYYMMDD")
            }
            Self::InvalidRepeatRule(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidRepeatRule(err) => Some(err),
            _ => None,
        }
    }
}

/// Validates `task` against `clock` and returns the normalized task.
///
/// # Errors
/// - `MissingTitle` when the title is blank after trimming.
/// - `InvalidDateFormat` when a non-empty date is not `YYYYMMDD`.
/// - `InvalidRepeatRule` when a non-empty rule yields no next occurrence.
pub fn validate_task(mut task: Task, clock: &impl Clock) -> Result<Task, TaskValidationError> {
    if task.title.trim().is_empty() {
        return Err(TaskValidationError::MissingTitle);
    }

    let now = clock.now();
    if task.date.is_empty() {
        task.date = format_storage_date(now.date());
    }

    let date = parse_storage_date(&task.date)
        .ok_or_else(|| TaskValidationError::InvalidDateFormat(task.date.clone()))?;

    if date.and_time(NaiveTime::MIN) < now {
        task.date = format_storage_date(now.date());
    }

    if task.is_recurring() {
        next_occurrence(now.date(), &task.date, &task.repeat)
            .map_err(TaskValidationError::InvalidRepeatRule)?;
    }

    Ok(task)
}
