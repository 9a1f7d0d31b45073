//! View derivation: pure computation of the display sequence.
//!
//! # Responsibility
//! - Produce the filtered, sorted view from (sequence, keyword, sort mode).
//!
//! # Invariants
//! - No side effects; the store sequence is never reordered in place.
//! - Sort runs before filter so a future position-dependent tie-break
//!   would observe the full sequence.

use crate::model::task::{SortMode, Task};
use std::cmp::Ordering;

/// Derives the display sequence for the given keyword and sort mode.
///
/// Alphabetical mode orders by case-insensitive title; the sort is stable,
/// so titles equal under case folding keep insertion order. Date mode
/// orders by creation time, keying unset timestamps as zero. Default keeps
/// insertion order. Filtering then retains tasks whose title contains
/// `keyword` case-insensitively; an empty keyword matches everything.
pub fn derive<'t>(tasks: &'t [Task], keyword: &str, sort: SortMode) -> Vec<&'t Task> {
    let mut display: Vec<&Task> = tasks.iter().collect();

    match sort {
        SortMode::Default => {}
        SortMode::Alphabetical => display.sort_by(|a, b| compare_titles(&a.title, &b.title)),
        SortMode::Date => display.sort_by_key(|task| task.created_at.unwrap_or(0)),
    }

    let needle = keyword.to_lowercase();
    if !needle.is_empty() {
        display.retain(|task| task.title.to_lowercase().contains(&needle));
    }

    display
}

/// Case-insensitive title ordering approximating locale collation.
fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
