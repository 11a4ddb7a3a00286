//! Recurrence rule grammar.
//!
//! Grammar: `d <n>` repeats every `n` days (`1 <= n <= 400`), `y` repeats
//! yearly. Nothing else is accepted.

use super::{RecurrenceError, RuleDefect};
use chrono::{Days, Months, NaiveDate};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Largest accepted day interval for `d <n>`.
pub const MAX_INTERVAL_DAYS: u32 = 400;

const INTERVAL_PREFIX: &str = "d ";
const YEARLY: &str = "y";

/// Parsed recurrence rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRule {
    EveryNDays(u32),
    Yearly,
}

impl DateRule {
    /// Advances `date` by exactly one rule step.
    ///
    /// Returns `None` when the result leaves `chrono`'s supported range.
    /// Yearly steps clamp Feb 29 to Feb 28 in non-leap years.
    pub fn step(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::EveryNDays(days) => date.checked_add_days(Days::new(u64::from(days))),
            Self::Yearly => date.checked_add_months(Months::new(12)),
        }
    }
}

impl FromStr for DateRule {
    type Err = RecurrenceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.is_empty() {
            return Err(RecurrenceError::EmptyRule);
        }

        let invalid = |defect| RecurrenceError::InvalidRule {
            rule: value.to_string(),
            defect,
        };

        if value == YEARLY {
            return Ok(Self::Yearly);
        }

        let Some(interval) = value.strip_prefix(INTERVAL_PREFIX) else {
            return Err(invalid(RuleDefect::UnknownForm));
        };

        let days = interval
            .parse::<i64>()
            .map_err(|_| invalid(RuleDefect::MalformedInterval))?;
        match u32::try_from(days) {
            Ok(days) if (1..=MAX_INTERVAL_DAYS).contains(&days) => Ok(Self::EveryNDays(days)),
            _ => Err(invalid(RuleDefect::IntervalOutOfRange(days))),
        }
    }
}

impl Display for DateRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EveryNDays(days) => write!(f, "{INTERVAL_PREFIX}{days}"),
            Self::Yearly => f.write_str(YEARLY),
        }
    }
}
