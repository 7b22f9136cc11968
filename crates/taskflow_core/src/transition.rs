//! Pure state transitions for user intents.
//!
//! # Responsibility
//! - Compute the next `AppState` from the previous one plus an intent.
//! - Update tasks, completed log and activity feed as one result value.
//!
//! # Invariants
//! - Inputs are never mutated; every transition works on a clone.
//! - Invalid intents (blank title, unknown id) are no-ops, never errors.
//! - `sequence` advances only on a successful add.

use crate::model::history::{ActivityEntry, ActivityKind, CompletedLogEntry};
use crate::model::state::{AppState, ACTIVITY_CAP, COMPLETED_LOG_CAP};
use crate::model::task::{create_task, TaskId};
use crate::ordering::{insert_activity, insert_completed, insert_task};

/// User intent accepted by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Add { title: String },
    Toggle { task_id: TaskId },
    Delete { task_id: TaskId },
}

impl Intent {
    /// Short label used in diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Add { .. } => "task_add",
            Self::Toggle { .. } => "task_toggle",
            Self::Delete { .. } => "task_delete",
        }
    }
}

/// Task id allocation policy: `"<now>-<sequence>"`.
///
/// Unique per state instance as long as `sequence` is monotonic. Two sessions
/// writing the same user key can collide.
pub fn allocate_task_id(now: i64, sequence: i64) -> TaskId {
    format!("{now}-{sequence}")
}

/// Applies `intent` at time `now`.
///
/// Returns `None` when the intent is a no-op, so callers can skip persistence.
pub fn apply_intent(state: &AppState, intent: &Intent, now: i64) -> Option<AppState> {
    match intent {
        Intent::Add { title } => try_add(state, title, now),
        Intent::Toggle { task_id } => try_toggle(state, task_id, now),
        Intent::Delete { task_id } => try_delete(state, task_id, now),
    }
}

/// Adds a task; returns an unchanged copy when `title` is blank.
pub fn add_task(state: &AppState, title: &str, now: i64) -> AppState {
    try_add(state, title, now).unwrap_or_else(|| state.clone())
}

/// Flips a task's completion; returns an unchanged copy for unknown ids.
pub fn toggle_task(state: &AppState, task_id: &str, now: i64) -> AppState {
    try_toggle(state, task_id, now).unwrap_or_else(|| state.clone())
}

/// Removes a task; returns an unchanged copy for unknown ids.
pub fn delete_task(state: &AppState, task_id: &str, now: i64) -> AppState {
    try_delete(state, task_id, now).unwrap_or_else(|| state.clone())
}

fn try_add(state: &AppState, title: &str, now: i64) -> Option<AppState> {
    let sequence = state.sequence.saturating_add(1);
    let task = create_task(allocate_task_id(now, sequence), title, now)?;

    let mut next = state.clone();
    next.sequence = sequence;
    let entry = ActivityEntry::record(ActivityKind::Added, &task.id, task.title.as_str(), now);
    insert_task(&mut next.tasks, task);
    insert_activity(&mut next.activity, entry, ACTIVITY_CAP);
    Some(next)
}

fn try_toggle(state: &AppState, task_id: &str, now: i64) -> Option<AppState> {
    let index = state.tasks.iter().position(|task| task.id == task_id)?;

    let mut next = state.clone();
    let task = &mut next.tasks[index];
    let kind = if task.completed {
        task.reopen();
        ActivityKind::Reopened
    } else {
        task.complete(now);
        ActivityKind::Completed
    };
    let entry = ActivityEntry::record(kind, &task.id, task.title.as_str(), now);

    if kind == ActivityKind::Completed {
        let snapshot = CompletedLogEntry {
            id: task.id.clone(),
            title: task.title.clone(),
            completed_at: now,
        };
        insert_completed(&mut next.completed_log, snapshot, COMPLETED_LOG_CAP);
    }
    insert_activity(&mut next.activity, entry, ACTIVITY_CAP);
    Some(next)
}

fn try_delete(state: &AppState, task_id: &str, now: i64) -> Option<AppState> {
    let index = state.tasks.iter().position(|task| task.id == task_id)?;

    let mut next = state.clone();
    let removed = next.tasks.remove(index);
    let entry = ActivityEntry::record(ActivityKind::Deleted, &removed.id, removed.title, now);
    insert_activity(&mut next.activity, entry, ACTIVITY_CAP);
    Some(next)
}
