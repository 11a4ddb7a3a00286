//! Domain model for reminder tasks.
//!
//! # Responsibility
//! - Define the task record exchanged between validation, storage and API layers.
//! - Own the calendar date formats used in storage and search input.
//!
//! # Invariants
//! - Task dates are calendar dates only; time-of-day is never stored.
//! - Task identity is assigned by the repository, never by the client.

pub mod task;
