//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the snapshot persistence contract used by the store.
//! - Isolate SQL and JSON codec details from state orchestration.
//!
//! # Invariants
//! - Repository reads reject malformed persisted state with typed errors;
//!   recovery policy belongs to the store, not this layer.

pub mod snapshot_repo;
