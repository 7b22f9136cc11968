//! Historical records derived from task transitions.
//!
//! # Responsibility
//! - Define the completed-log snapshot and the activity feed record.
//! - Own the closed set of activity kinds and their wire labels.
//!
//! # Invariants
//! - Records are snapshots; they are never re-synced with the live task.
//! - `ActivityKind` has exactly four variants; anything else is rejected at decode.

use crate::model::task::TaskId;
use serde::Serialize;

/// Snapshot written each time a task transitions into completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedLogEntry {
    /// Id of the task at the moment of completion.
    pub id: TaskId,
    pub title: String,
    pub completed_at: i64,
}

/// Event kinds recorded in the activity feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Added,
    Completed,
    Reopened,
    Deleted,
}

impl ActivityKind {
    /// Stable wire label, also used in derived activity ids.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Completed => "completed",
            Self::Reopened => "reopened",
            Self::Deleted => "deleted",
        }
    }

    /// Parses a stored label. Unknown labels yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "added" => Some(Self::Added),
            "completed" => Some(Self::Completed),
            "reopened" => Some(Self::Reopened),
            "deleted" => Some(Self::Deleted),
            _ => None,
        }
    }
}

/// One entry of the bounded recent-activity timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEntry {
    /// Derived list identity, not guaranteed collision-free.
    pub id: String,
    /// Serialized as `type` to match the stored blob schema.
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub title: String,
    pub at: i64,
}

impl ActivityEntry {
    /// Builds an entry whose id is derived from `at`, `task_id` and `kind`.
    pub fn record(kind: ActivityKind, task_id: &str, title: impl Into<String>, at: i64) -> Self {
        Self {
            id: activity_entry_id(at, task_id, kind),
            kind,
            title: title.into(),
            at,
        }
    }
}

/// Derives an activity id as `"<at>-<task_id>-<kind>"`.
pub fn activity_entry_id(at: i64, task_id: &str, kind: ActivityKind) -> String {
    format!("{at}-{task_id}-{}", kind.as_str())
}
