//! Completion policy for done tasks.
//!
//! # Invariants
//! - One-off tasks are deleted; recurring tasks only get a new `date`.
//! - Deciding never mutates the task; callers apply the returned action.

use crate::clock::Clock;
use crate::model::task::{format_storage_date, Task};
use crate::recurrence::{next_occurrence, RecurrenceResult};
use chrono::NaiveDate;

/// Outcome of marking a task as done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionAction {
    DeleteTask,
    Reschedule(NaiveDate),
}

impl CompletionAction {
    /// Returns the task to persist, or `None` when the task should be deleted.
    pub fn apply(self, task: Task) -> Option<Task> {
        match self {
            Self::DeleteTask => None,
            Self::Reschedule(date) => Some(Task {
                date: format_storage_date(date),
                ..task
            }),
        }
    }
}

/// Decides how to complete `task` at the clock's current instant.
///
/// # Errors
/// - Any recurrence error for the stored rule or date; nothing is decided.
pub fn complete_task(task: &Task, clock: &impl Clock) -> RecurrenceResult<CompletionAction> {
    if !task.is_recurring() {
        return Ok(CompletionAction::DeleteTask);
    }

    next_occurrence(clock.today(), &task.date, &task.repeat).map(CompletionAction::Reschedule)
}

#[cfg(test)]
mod tests {
    use super::{complete_task, CompletionAction};
    use crate::clock::FixedClock;
    use crate::model::task::Task;
    use crate::recurrence::RecurrenceError;
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn clock_on(day: NaiveDate) -> FixedClock {
        FixedClock::new(day.and_hms_opt(12, 0, 0).expect("valid time"))
    }

    #[test]
    fn one_off_task_is_deleted() {
        let task = Task::new("20240105", "once");
        assert_eq!(
            complete_task(&task, &clock_on(date(2024, 1, 1))),
            Ok(CompletionAction::DeleteTask)
        );
        assert_eq!(CompletionAction::DeleteTask.apply(task), None);
    }

    #[test]
    fn weekly_task_a_week_overdue_moves_to_reference() {
        let reference = date(2024, 1, 8);
        let task = Task::new("20240101", "weekly").with_repeat("d 7");
        let action = complete_task(&task, &clock_on(reference)).expect("rule should be valid");

        let CompletionAction::Reschedule(next) = action else {
            panic!("expected reschedule, got {action:?}");
        };
        assert!(next >= reference);
        assert_eq!(next, reference);
    }

    #[test]
    fn reschedule_only_touches_date() {
        let task = Task::new("20240101", "yearly")
            .with_comment("keep me")
            .with_repeat("y")
            .with_id("7");
        let action = complete_task(&task, &clock_on(date(2024, 6, 1))).expect("rule should be valid");
        let updated = action.apply(task.clone()).expect("task should be kept");

        assert_eq!(updated.date, "20250101");
        assert_eq!(
            Task {
                date: task.date.clone(),
                ..updated
            },
            task
        );
    }

    #[test]
    fn broken_stored_rule_aborts_completion() {
        let task = Task::new("20240101", "bad").with_repeat("d 0");
        assert!(matches!(
            complete_task(&task, &clock_on(date(2024, 1, 1))),
            Err(RecurrenceError::InvalidRule { .. })
        ));
    }
}
