//! Versioned text codec for `AppState`.
//!
//! # Responsibility
//! - Encode state as the current schema (version 2) JSON blob.
//! - Decode current and legacy (version 1) blobs with per-record coercion.
//!
//! # Invariants
//! - Decoding never fails: unparsable, unversioned or unknown-version input
//!   yields the empty default state.
//! - Records failing coercion are dropped individually; siblings survive.
//! - Decoded lists are re-sorted by the ordering policy; activity is capped,
//!   the completed log is not.

use crate::model::history::{ActivityEntry, ActivityKind, CompletedLogEntry};
use crate::model::state::{AppState, ACTIVITY_CAP};
use crate::model::task::{normalize_title, Task};
use crate::ordering::{sort_activity, sort_completed_log, sort_tasks};
use serde::Serialize;
use serde_json::{Map, Value};

/// Schema version written by [`encode_state`].
pub const CURRENT_SCHEMA_VERSION: u32 = 2;
/// Legacy schema: tasks and sequence only.
pub const LEGACY_SCHEMA_VERSION: u32 = 1;

/// Outcome classification for one decode call, used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus {
    Current,
    Legacy,
    Unparsable,
    MissingVersion,
    UnsupportedVersion,
}

impl DecodeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Legacy => "legacy",
            Self::Unparsable => "unparsable",
            Self::MissingVersion => "missing_version",
            Self::UnsupportedVersion => "unsupported_version",
        }
    }

    /// Whether the blob was discarded in favor of the empty state.
    pub fn is_fallback(self) -> bool {
        !matches!(self, Self::Current | Self::Legacy)
    }
}

/// Decoded state plus how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeReport {
    pub state: AppState,
    pub status: DecodeStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredState<'a> {
    version: u32,
    tasks: &'a [Task],
    sequence: i64,
    completed_log: &'a [CompletedLogEntry],
    activity: &'a [ActivityEntry],
}

/// Encodes `state` as a version-2 blob.
pub fn encode_state(state: &AppState) -> Result<String, serde_json::Error> {
    serde_json::to_string(&StoredState {
        version: CURRENT_SCHEMA_VERSION,
        tasks: &state.tasks,
        sequence: state.sequence,
        completed_log: &state.completed_log,
        activity: &state.activity,
    })
}

/// Decodes an optional stored blob; absence yields the empty state.
pub fn decode_state(raw: Option<&str>) -> AppState {
    match raw {
        Some(text) => decode_report(text).state,
        None => AppState::empty(),
    }
}

/// Decodes a stored blob and reports which schema path was taken.
pub fn decode_report(raw: &str) -> DecodeReport {
    let root: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(_) => return fallback(DecodeStatus::Unparsable),
    };

    let Some(version) = root.get("version").and_then(Value::as_f64) else {
        return fallback(DecodeStatus::MissingVersion);
    };

    if version == f64::from(LEGACY_SCHEMA_VERSION) {
        let tasks = root.get("todos").or_else(|| root.get("tasks"));
        DecodeReport {
            state: AppState {
                tasks: decode_tasks(tasks),
                sequence: decode_sequence(root.get("sequence")),
                completed_log: Vec::new(),
                activity: Vec::new(),
            },
            status: DecodeStatus::Legacy,
        }
    } else if version == f64::from(CURRENT_SCHEMA_VERSION) {
        DecodeReport {
            state: AppState {
                tasks: decode_tasks(root.get("tasks")),
                sequence: decode_sequence(root.get("sequence")),
                completed_log: decode_completed_log(root.get("completedLog")),
                activity: decode_activity(root.get("activity")),
            },
            status: DecodeStatus::Current,
        }
    } else {
        fallback(DecodeStatus::UnsupportedVersion)
    }
}

fn fallback(status: DecodeStatus) -> DecodeReport {
    DecodeReport {
        state: AppState::empty(),
        status,
    }
}

fn decode_sequence(value: Option<&Value>) -> i64 {
    value.and_then(finite_millis).unwrap_or(0)
}

fn decode_tasks(value: Option<&Value>) -> Vec<Task> {
    let mut tasks: Vec<Task> = records(value).filter_map(coerce_task).collect();
    sort_tasks(&mut tasks);
    tasks
}

fn decode_completed_log(value: Option<&Value>) -> Vec<CompletedLogEntry> {
    let mut entries: Vec<CompletedLogEntry> =
        records(value).filter_map(coerce_completed).collect();
    sort_completed_log(&mut entries);
    entries
}

fn decode_activity(value: Option<&Value>) -> Vec<ActivityEntry> {
    let mut entries: Vec<ActivityEntry> = records(value).filter_map(coerce_activity).collect();
    sort_activity(&mut entries);
    entries.truncate(ACTIVITY_CAP);
    entries
}

// Object records of an array field; anything else contributes nothing.
fn records<'a>(value: Option<&'a Value>) -> impl Iterator<Item = &'a Map<String, Value>> + 'a {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn coerce_task(record: &Map<String, Value>) -> Option<Task> {
    let id = string_field(record, "id")?;
    let title = normalize_title(string_field(record, "title")?)?;
    let completed = record.get("completed")?.as_bool()?;
    let created_at = finite_millis(record.get("createdAt")?)?;
    let completed_at = if completed {
        record.get("completedAt").and_then(finite_millis)
    } else {
        None
    };

    Some(Task {
        id: id.to_string(),
        title,
        completed,
        created_at,
        completed_at,
    })
}

fn coerce_completed(record: &Map<String, Value>) -> Option<CompletedLogEntry> {
    Some(CompletedLogEntry {
        id: string_field(record, "id")?.to_string(),
        title: normalize_title(string_field(record, "title")?)?,
        completed_at: finite_millis(record.get("completedAt")?)?,
    })
}

fn coerce_activity(record: &Map<String, Value>) -> Option<ActivityEntry> {
    Some(ActivityEntry {
        id: string_field(record, "id")?.to_string(),
        kind: ActivityKind::parse(string_field(record, "type")?)?,
        title: normalize_title(string_field(record, "title")?)?,
        at: finite_millis(record.get("at")?)?,
    })
}

fn string_field<'a>(record: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    record.get(name)?.as_str()
}

/// Accepts any finite JSON number; fractional values truncate toward zero.
///
/// Numbers are kept as text while parsing, so a literal outside the `f64`
/// range (`1e400`) reaches this point and is rejected here instead of failing
/// the whole document.
fn finite_millis(value: &Value) -> Option<i64> {
    if let Some(integer) = value.as_i64() {
        return Some(integer);
    }
    let float = value.as_f64()?;
    if float.is_finite() {
        Some(float.trunc() as i64)
    } else {
        None
    }
}
