//! Domain model for the task list.
//!
//! # Responsibility
//! - Define the canonical task record and the view sort modes.
//!
//! # Invariants
//! - Every task is identified by a stable numeric `TaskId`.
//! - Serialized shapes stay compatible with the legacy slot format.

pub mod task;
