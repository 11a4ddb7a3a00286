//! Next-occurrence computation.
//!
//! # Invariants
//! - Candidates start one step after the anchor.
//! - The returned date is the first candidate not before the reference date.

use super::{DateRule, RecurrenceError, RecurrenceResult};
use crate::model::task::{format_storage_date, parse_storage_date};
use chrono::{Days, NaiveDate};

/// Computes the first occurrence of `rule`, stepping from `anchor_date`, that
/// is not strictly before `reference`.
///
/// # Errors
/// - `EmptyRule` / `InvalidRule` when `rule` does not parse.
/// - `InvalidDate` when `anchor_date` is not `YYYYMMDD`.
/// - `DateOutOfRange` when stepping overflows the calendar.
pub fn next_occurrence(
    reference: NaiveDate,
    anchor_date: &str,
    rule: &str,
) -> RecurrenceResult<NaiveDate> {
    let rule: DateRule = rule.parse()?;
    let anchor = parse_storage_date(anchor_date)
        .ok_or_else(|| RecurrenceError::InvalidDate(anchor_date.to_string()))?;
    first_on_or_after(rule, anchor, reference)
}

/// Same as [`next_occurrence`], rendered as `YYYYMMDD`.
pub fn next_occurrence_string(
    reference: NaiveDate,
    anchor_date: &str,
    rule: &str,
) -> RecurrenceResult<String> {
    next_occurrence(reference, anchor_date, rule).map(format_storage_date)
}

fn first_on_or_after(
    rule: DateRule,
    anchor: NaiveDate,
    reference: NaiveDate,
) -> RecurrenceResult<NaiveDate> {
    let mut candidate = rule.step(anchor).ok_or(RecurrenceError::DateOutOfRange)?;

    match rule {
        DateRule::EveryNDays(days) => {
            // Fixed-length steps: jump straight to the first candidate >= reference.
            if candidate < reference {
                let gap = reference.signed_duration_since(candidate).num_days();
                let interval = i64::from(days);
                let steps = (gap + interval - 1) / interval;
                let offset =
                    u64::try_from(steps * interval).map_err(|_| RecurrenceError::DateOutOfRange)?;
                candidate = candidate
                    .checked_add_days(Days::new(offset))
                    .ok_or(RecurrenceError::DateOutOfRange)?;
            }
        }
        DateRule::Yearly => {
            while candidate < reference {
                candidate = rule.step(candidate).ok_or(RecurrenceError::DateOutOfRange)?;
            }
        }
    }

    Ok(candidate)
}
