//! Wall-clock abstraction.
//!
//! # Responsibility
//! - Provide "now" to validation and completion without reading ambient state.
//! - Allow tests to pin time deterministically.
//!
//! # Invariants
//! - Time is naive local wall time; no time zone conversion happens in core.

use chrono::{Local, NaiveDate, NaiveDateTime};

/// Source of the current instant and calendar date.
pub trait Clock {
    /// Current instant (local wall time).
    fn now(&self) -> NaiveDateTime;

    /// Current calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

/// Production clock backed by the system's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: NaiveDateTime,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now
    }
}
