//! Task domain model.
//!
//! # Responsibility
//! - Define the single trackable unit of work.
//! - Provide the only validating constructor used by add transitions and decode.
//!
//! # Invariants
//! - `id` is assigned once at creation and never reassigned.
//! - `title` is trimmed and non-empty.
//! - `created_at` is immutable after creation.
//! - `completed_at.is_some() == completed`.

use serde::Serialize;

/// Opaque task identifier (`"<created_at>-<sequence>"` for locally created tasks).
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = String;

/// A single trackable to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    /// Trimmed, never empty.
    pub title: String,
    pub completed: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Serialized as `null` while the task is open.
    pub completed_at: Option<i64>,
}

impl Task {
    /// Marks the task completed at `now`.
    pub(crate) fn complete(&mut self, now: i64) {
        self.completed = true;
        self.completed_at = Some(now);
    }

    /// Moves the task back to the open state.
    pub(crate) fn reopen(&mut self) {
        self.completed = false;
        self.completed_at = None;
    }
}

/// Creates an open task from raw user input.
///
/// Returns `None` when `raw_title` is empty after trimming; callers must leave
/// the rest of their state untouched in that case.
pub fn create_task(id: impl Into<TaskId>, raw_title: &str, created_at: i64) -> Option<Task> {
    let title = normalize_title(raw_title)?;
    Some(Task {
        id: id.into(),
        title,
        completed: false,
        created_at,
        completed_at: None,
    })
}

/// Trims a title candidate, rejecting empty results.
pub(crate) fn normalize_title(raw: &str) -> Option<String> {
    let trimmed = trim_text(raw);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Trims Unicode whitespace plus U+FEFF (byte order mark / zero-width no-break space).
pub(crate) fn trim_text(raw: &str) -> &str {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}
