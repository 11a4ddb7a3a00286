//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the task data access contract consumed by services.
//! - Isolate SQLite query details from validation and completion logic.
//!
//! # Invariants
//! - Repositories never validate or normalize tasks; services do.
//! - `update`/`delete` report affected rows; callers decide what zero means.

pub mod task_repo;
