//! Search term routing.
//!
//! # Responsibility
//! - Decide whether a search term addresses a due date or task text.
//!
//! # Invariants
//! - Classification never fails; anything that is not a `DD.MM.YYYY` date is
//!   treated as a text fragment.

pub mod classify;
