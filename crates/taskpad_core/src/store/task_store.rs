//! Task store: intent dispatch over the authoritative sequence.
//!
//! # Responsibility
//! - Apply user intents through a single state-transition function.
//! - Persist a whole-sequence snapshot after every successful mutation.
//! - Rehydrate state from the durable slot at startup.
//!
//! # Invariants
//! - Ids come from the persisted counter and are never reused.
//! - A mutation is persisted before `apply` reports it as `Mutated`.
//! - Invalid input and stale references are silent no-ops.

use crate::model::task::{is_blank_title, SortMode, Task, TaskId};
use crate::repo::snapshot_repo::{RepoError, RepoResult, SnapshotRepository};
use crate::view;
use log::{info, warn};
use std::time::{SystemTime, UNIX_EPOCH};

/// User intention dispatched into [`TaskStore::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Append a task; ignored when the trimmed title is empty.
    Add { title: String },
    /// Remove a task by id; ignored when absent.
    Delete { id: TaskId },
    /// Mark a task as under edit and seed the draft with its title.
    BeginEdit { id: TaskId },
    /// Replace the draft title.
    SetDraft { title: String },
    /// Apply the draft to the task under edit and clear the marker.
    CommitEdit,
    /// Flip a task's completion flag; ignored when absent.
    ToggleCompleted { id: TaskId },
    /// Replace the live search keyword.
    SetSearch { keyword: String },
    /// Select the view sort mode.
    SetSort { mode: SortMode },
}

/// What an intent did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The task sequence changed and the snapshot was written.
    Mutated,
    /// Only transient view state changed; nothing was persisted.
    Transient,
    /// The intent was silently ignored (blank input or stale reference).
    Ignored,
}

/// Authoritative task state plus its persistence handle.
pub struct TaskStore<R: SnapshotRepository> {
    repo: R,
    tasks: Vec<Task>,
    next_id: TaskId,
    editing: Option<TaskId>,
    draft: String,
    keyword: String,
    sort: SortMode,
}

impl<R: SnapshotRepository> TaskStore<R> {
    /// Opens the store, rehydrating the sequence from the durable slot.
    ///
    /// A missing snapshot starts the store empty. A malformed snapshot is
    /// recovered by starting empty and logging a warning; the bad value is
    /// overwritten by the next successful save. Database errors propagate.
    pub fn open(repo: R) -> RepoResult<Self> {
        let (tasks, next_id) = match repo.load_snapshot() {
            Ok(Some(snapshot)) => {
                // The counter never goes below max(id) + 1; a lower stored
                // value (hand-edited slot) would reuse live ids.
                let floor = counter_floor(&snapshot.tasks);
                let next_id = snapshot.next_id.map_or(floor, |stored| stored.max(floor));
                (snapshot.tasks, next_id)
            }
            Ok(None) => (Vec::new(), 1),
            Err(RepoError::InvalidData { slot, message }) => {
                warn!(
                    "event=snapshot_load module=store status=recovered slot={slot} error={message}"
                );
                (Vec::new(), 1)
            }
            Err(other) => return Err(other),
        };

        info!(
            "event=store_open module=store status=ok count={} next_id={next_id}",
            tasks.len()
        );

        Ok(Self {
            repo,
            tasks,
            next_id,
            editing: None,
            draft: String::new(),
            keyword: String::new(),
            sort: SortMode::Default,
        })
    }

    /// Applies one intent; persists the snapshot when the sequence changed.
    ///
    /// # Errors
    /// Returns the repository error when the post-mutation snapshot write
    /// fails. The in-memory mutation is kept: the store stays authoritative
    /// and the next successful write restores the slot.
    pub fn apply(&mut self, intent: Intent) -> RepoResult<Applied> {
        let applied = self.transition(intent);
        if applied == Applied::Mutated {
            if let Err(err) = self.repo.save_snapshot(&self.tasks, self.next_id) {
                warn!("event=snapshot_save module=store status=error error={err}");
                return Err(err);
            }
        }
        Ok(applied)
    }

    fn transition(&mut self, intent: Intent) -> Applied {
        match intent {
            Intent::Add { title } => {
                if is_blank_title(&title) {
                    return Applied::Ignored;
                }
                self.tasks.push(Task::new(self.next_id, title, now_epoch_ms()));
                self.next_id += 1;
                Applied::Mutated
            }
            Intent::Delete { id } => {
                let before = self.tasks.len();
                self.tasks.retain(|task| task.id != id);
                if self.tasks.len() == before {
                    Applied::Ignored
                } else {
                    Applied::Mutated
                }
            }
            Intent::BeginEdit { id } => match self.tasks.iter().find(|task| task.id == id) {
                Some(task) => {
                    self.draft = task.title.clone();
                    self.editing = Some(id);
                    Applied::Transient
                }
                None => Applied::Ignored,
            },
            Intent::SetDraft { title } => {
                self.draft = title;
                Applied::Transient
            }
            Intent::CommitEdit => {
                let Some(id) = self.editing.take() else {
                    return Applied::Ignored;
                };
                match self.tasks.iter_mut().find(|task| task.id == id) {
                    // The draft is applied verbatim: only creation validates
                    // titles, commit never does.
                    Some(task) => {
                        task.title = self.draft.clone();
                        Applied::Mutated
                    }
                    // Stale marker (task deleted mid-edit): the marker is
                    // cleared, the sequence stays untouched.
                    None => Applied::Transient,
                }
            }
            Intent::ToggleCompleted { id } => {
                match self.tasks.iter_mut().find(|task| task.id == id) {
                    Some(task) => {
                        task.completed = !task.completed;
                        Applied::Mutated
                    }
                    None => Applied::Ignored,
                }
            }
            Intent::SetSearch { keyword } => {
                self.keyword = keyword;
                Applied::Transient
            }
            Intent::SetSort { mode } => {
                self.sort = mode;
                Applied::Transient
            }
        }
    }

    /// Derived display sequence for the current keyword and sort mode.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        view::derive(&self.tasks, &self.keyword, self.sort)
    }

    /// Full sequence in insertion order, unfiltered.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Id of the task currently under edit.
    pub fn editing(&self) -> Option<TaskId> {
        self.editing
    }

    /// Current draft title; meaningful while an edit is in progress.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Live search keyword.
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Selected sort mode.
    pub fn sort(&self) -> SortMode {
        self.sort
    }

    /// Next id the counter will assign.
    pub fn next_id(&self) -> TaskId {
        self.next_id
    }
}

/// Lowest counter value that cannot reuse a live id: `max(id) + 1`.
/// Legacy snapshots without a stored counter start here.
fn counter_floor(tasks: &[Task]) -> TaskId {
    tasks.iter().map(|task| task.id).max().map_or(1, |max| max + 1)
}

fn now_epoch_ms() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_millis() as i64,
        // Clock before the epoch: fall back to the degenerate zero key.
        Err(_) => 0,
    }
}
