//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record persisted in the `tasks` slot.
//! - Define the sort modes understood by view derivation.
//!
//! # Invariants
//! - `id` is assigned once by the store counter and never reused.
//! - Serialized field names match the legacy slot format (camelCase).

use serde::{Deserialize, Serialize};

/// Stable numeric identifier for a task.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = u64;

/// A single to-do entry as stored in the `tasks` slot.
///
/// `title` is kept verbatim as the user typed it; creation rejects input
/// whose trimmed form is empty but never trims what it stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Stable id from the persisted counter.
    pub id: TaskId,
    /// User-supplied text, stored verbatim.
    pub title: String,
    /// Completion flag. Starts `false`, flipped by the toggle intent.
    pub completed: bool,
    /// Creation time in epoch milliseconds. Absent in legacy snapshots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

impl Task {
    /// Creates an open task with the given id and creation timestamp.
    pub fn new(id: TaskId, title: impl Into<String>, created_at: i64) -> Self {
        Self {
            id,
            title: title.into(),
            completed: false,
            created_at: Some(created_at),
        }
    }
}

/// Ordering applied by view derivation before filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Insertion order, no reordering.
    #[default]
    Default,
    /// Ascending case-insensitive title order.
    Alphabetical,
    /// Ascending creation time; unset timestamps sort as zero.
    Date,
}

impl SortMode {
    /// Parses a user-facing mode keyword.
    pub fn parse(value: &str) -> Option<SortMode> {
        match value.trim().to_ascii_lowercase().as_str() {
            "default" | "none" => Some(SortMode::Default),
            "alphabetical" | "alpha" => Some(SortMode::Alphabetical),
            "date" => Some(SortMode::Date),
            _ => None,
        }
    }

    /// Stable keyword used when rendering the active mode.
    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Default => "default",
            SortMode::Alphabetical => "alphabetical",
            SortMode::Date => "date",
        }
    }
}

/// Returns whether `title` is rejected by task creation.
pub fn is_blank_title(title: &str) -> bool {
    title.trim().is_empty()
}
