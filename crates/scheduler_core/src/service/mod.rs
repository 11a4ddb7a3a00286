//! Core use-case services.
//!
//! # Responsibility
//! - Validate and normalize task payloads before persistence.
//! - Decide what completing a task means (delete or reschedule).
//! - Orchestrate repository calls into use-case level APIs.
//!
//! # See also
//! - `crate::recurrence` for the occurrence arithmetic both policies rely on.

pub mod completion;
pub mod task_service;
pub mod validation;
