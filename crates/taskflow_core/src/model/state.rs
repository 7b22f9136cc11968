//! Application state aggregate root.

use crate::model::history::{ActivityEntry, CompletedLogEntry};
use crate::model::task::Task;

/// Maximum completed-log entries kept after an insertion.
pub const COMPLETED_LOG_CAP: usize = 300;
/// Maximum activity entries kept after an insertion or decode.
pub const ACTIVITY_CAP: usize = 200;

/// Full per-user state: live tasks plus derived history.
///
/// # Invariants
/// - `tasks` is sorted by the task ordering policy.
/// - `completed_log` is newest-first by `completed_at`.
/// - `activity` is newest-first and holds at most [`ACTIVITY_CAP`] entries.
/// - `sequence` never decreases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub tasks: Vec<Task>,
    pub sequence: i64,
    pub completed_log: Vec<CompletedLogEntry>,
    pub activity: Vec<ActivityEntry>,
}

impl AppState {
    /// Returns the empty default state.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Finds a live task by id.
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }
}
