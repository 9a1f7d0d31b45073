//! Authoritative task state and intent dispatch.
//!
//! # Responsibility
//! - Own the task sequence, its transient view fields, and the
//!   write-through persistence handle.
//!
//! # Invariants
//! - Every sequence mutation is persisted before it is reported applied.

pub mod task_store;
