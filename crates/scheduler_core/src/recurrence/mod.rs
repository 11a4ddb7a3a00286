//! Recurrence rules and next-occurrence computation.
//!
//! # Responsibility
//! - Parse rule strings into the closed `DateRule` set.
//! - Compute the first occurrence on or after a reference date.
//!
//! # Invariants
//! - Only `d <n>` (1..=400) and `y` rules exist.
//! - The engine never returns the anchor date itself.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod engine;
pub mod rule;

pub use engine::{next_occurrence, next_occurrence_string};
pub use rule::{DateRule, MAX_INTERVAL_DAYS};

pub type RecurrenceResult<T> = Result<T, RecurrenceError>;

/// Why a non-empty rule string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleDefect {
    /// Neither `d <n>` nor `y`.
    UnknownForm,
    /// `d ` prefix followed by something that is not an integer.
    MalformedInterval,
    /// `d <n>` with `n` outside `1..=400`.
    IntervalOutOfRange(i64),
}

impl Display for RuleDefect {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownForm => f.write_str("unsupported rule format"),
            Self::MalformedInterval => f.write_str("day interval is not an integer"),
            Self::IntervalOutOfRange(days) => write!(
                f,
                "day interval {days} is out of range 1..={}",
                rule::MAX_INTERVAL_DAYS
            ),
        }
    }
}

/// Error for rule parsing and occurrence computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceError {
    EmptyRule,
    InvalidRule { rule: String, defect: RuleDefect },
    /// Anchor date is not a `YYYYMMDD` calendar date.
    InvalidDate(String),
    /// Stepping left the calendar range supported by `chrono`.
    DateOutOfRange,
}

impl Display for RecurrenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRule => f.write_str("repeat rule is empty"),
            Self::InvalidRule { rule, defect } => {
                write!(f, "invalid repeat rule `{rule}`: {defect}")
            }
            Self::InvalidDate(value) => {
                write!(f, "invalid date `{value}`: expected YYYYMMDD")
            }
            Self::DateOutOfRange => f.write_str("next occurrence is out of calendar range"),
        }
    }
}

impl Error for RecurrenceError {}
