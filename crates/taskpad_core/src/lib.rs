//! Core domain logic for taskpad.
//! This crate is the single source of truth for task-list behavior.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;
pub mod view;

pub use logging::{default_log_level, init_logging};
pub use model::task::{SortMode, Task, TaskId};
pub use repo::snapshot_repo::{
    RepoError, RepoResult, SnapshotRepository, SqliteSnapshotRepository, StoredSnapshot,
};
pub use store::task_store::{Applied, Intent, TaskStore};
pub use view::derive as derive_view;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
