//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its opaque identifier.
//! - Provide strict parsing/formatting for storage (`YYYYMMDD`) and search
//!   (`DD.MM.YYYY`) date formats.
//!
//! # Invariants
//! - After validation, `date` is a well-formed `YYYYMMDD` calendar date.
//! - An empty `repeat` means the task is one-off.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// `chrono` pattern for dates as stored and sent on the wire.
pub const DATE_FORMAT: &str = "%Y%m%d";
/// `chrono` pattern for dates typed into the search box.
pub const SEARCH_DATE_FORMAT: &str = "%d.%m.%Y";

static STORAGE_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{8}$").expect("valid storage date regex"));
static SEARCH_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}\.\d{2}\.\d{4}$").expect("valid search date regex"));

/// Opaque task identifier assigned by the repository.
///
/// Empty for tasks that have not been persisted yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns whether this id was never assigned (or was sent blank).
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for TaskId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Reminder task as persisted and exchanged on the wire.
///
/// Missing JSON fields deserialize as empty strings, so partial payloads reach
/// validation instead of failing at the decoding step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    pub id: TaskId,
    /// Due date in `YYYYMMDD` form; empty means "today" until validated.
    pub date: String,
    pub title: String,
    pub comment: String,
    /// Recurrence rule (`d <n>` or `y`); empty for one-off tasks.
    pub repeat: String,
}

impl Task {
    /// Creates an unsaved task with empty comment and no recurrence.
    pub fn new(date: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: TaskId::default(),
            date: date.into(),
            title: title.into(),
            comment: String::new(),
            repeat: String::new(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn with_repeat(mut self, repeat: impl Into<String>) -> Self {
        self.repeat = repeat.into();
        self
    }

    pub fn with_id(mut self, id: impl Into<TaskId>) -> Self {
        self.id = id.into();
        self
    }

    /// Returns whether completing this task advances it instead of deleting it.
    pub fn is_recurring(&self) -> bool {
        !self.repeat.is_empty()
    }
}

/// Parses a storage date (`YYYYMMDD`).
///
/// Exactly eight ASCII digits are required; `chrono` alone would also accept
/// shorter day/month fields.
pub fn parse_storage_date(value: &str) -> Option<NaiveDate> {
    if !STORAGE_DATE_RE.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Formats a calendar date as `YYYYMMDD`.
pub fn format_storage_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a search date (`DD.MM.YYYY`) with zero-padded day and month.
pub fn parse_search_date(value: &str) -> Option<NaiveDate> {
    if !SEARCH_DATE_RE.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, SEARCH_DATE_FORMAT).ok()
}
