//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose board/user use-cases to Dart via FRB as flat records.
//! - Open storage per call; the UI never holds engine state.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every mutating call persists before it returns its snapshot.

use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;
use taskflow_core::db::open_db;
use taskflow_core::{
    clear_active_user as clear_active_user_inner, core_version as core_version_inner,
    init_logging as init_logging_inner, load_active_user, ping as ping_inner,
    save_active_user, ActivityEntry, AppState, CompletedLogEntry, InsightSummary, SqliteKvStore,
    StorageKeys, SystemClock, Task, TaskSession,
};

const STATE_DB_FILE_NAME: &str = "taskflow_state.sqlite3";
static STATE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Task row for list rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: i64,
    pub completed_at: Option<i64>,
}

/// Completed-log row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedItem {
    pub task_id: String,
    pub title: String,
    pub completed_at: i64,
}

/// Activity timeline row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityItem {
    pub id: String,
    /// `added|completed|reopened|deleted`.
    pub kind: String,
    pub title: String,
    pub at: i64,
}

/// Summary statistics panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightsView {
    pub total: u32,
    pub completed_count: u32,
    pub active_count: u32,
    pub completion_rate: u32,
    pub completed_today: u32,
    pub last_completed: Option<CompletedItem>,
}

/// Full board snapshot returned by every board call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardResponse {
    pub ok: bool,
    /// Whether the intent changed state (always `false` for loads).
    pub changed: bool,
    pub message: String,
    /// Newest-first.
    pub tasks: Vec<TaskItem>,
    /// Newest-first.
    pub completed_log: Vec<CompletedItem>,
    /// Newest-first, at most 200 rows.
    pub activity: Vec<ActivityItem>,
    pub insights: InsightsView,
}

/// Active-user slot response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserResponse {
    pub ok: bool,
    pub username: Option<String>,
    pub message: String,
}

/// Loads the board for `username`.
#[flutter_rust_bridge::frb(sync)]
pub fn board_load(username: String) -> BoardResponse {
    with_session(username.as_str(), "board_load", |_| Ok(false))
}

/// Adds a task; blank titles are a no-op with `changed=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(username: String, title: String) -> BoardResponse {
    with_session(username.as_str(), "task_add", |session| {
        session.add(title.as_str())
    })
}

/// Toggles a task's completion.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(username: String, task_id: String) -> BoardResponse {
    with_session(username.as_str(), "task_toggle", |session| {
        session.toggle(task_id.as_str())
    })
}

/// Deletes a task; completion history is kept.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(username: String, task_id: String) -> BoardResponse {
    with_session(username.as_str(), "task_delete", |session| {
        session.delete(task_id.as_str())
    })
}

/// Reads the persisted active username.
#[flutter_rust_bridge::frb(sync)]
pub fn active_user_get() -> UserResponse {
    with_user_store("active_user_get", |store, keys| load_active_user(&*store, keys))
}

/// Persists the active username (trimmed); blank input clears it.
#[flutter_rust_bridge::frb(sync)]
pub fn active_user_set(username: String) -> UserResponse {
    with_user_store("active_user_set", |store, keys| {
        save_active_user(store, keys, username.as_str())?;
        load_active_user(&*store, keys)
    })
}

/// Removes the persisted active username.
#[flutter_rust_bridge::frb(sync)]
pub fn active_user_clear() -> UserResponse {
    with_user_store("active_user_clear", |store, keys| {
        clear_active_user_inner(store, keys)?;
        Ok(None)
    })
}

type BridgeSession<'conn> = TaskSession<SqliteKvStore<'conn>, SystemClock>;

fn with_session(
    username: &str,
    operation: &str,
    f: impl FnOnce(&mut BridgeSession<'_>) -> taskflow_core::StoreResult<bool>,
) -> BoardResponse {
    let conn = match open_db(resolve_state_db_path()) {
        Ok(conn) => conn,
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error op={operation} error_code=db_open_failed");
            return BoardResponse::failure(format!("{operation} failed: {err}"));
        }
    };
    let store = match SqliteKvStore::try_new(&conn) {
        Ok(store) => store,
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error op={operation} error_code=store_init_failed");
            return BoardResponse::failure(format!("{operation} failed: {err}"));
        }
    };

    let keys = StorageKeys::default();
    let mut session = TaskSession::open(store, SystemClock, &keys, username);
    let outcome = f(&mut session);
    let insights = session.insights();
    match outcome {
        Ok(changed) => {
            let message = if changed { "Saved." } else { "No changes." };
            BoardResponse::snapshot(session.state(), &insights, changed, message)
        }
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error op={operation} error_code=persist_failed");
            let mut response =
                BoardResponse::snapshot(session.state(), &insights, false, String::new());
            response.ok = false;
            response.message = format!("{operation} failed to persist: {err}");
            response
        }
    }
}

fn with_user_store(
    operation: &str,
    f: impl FnOnce(
        &mut SqliteKvStore<'_>,
        &StorageKeys,
    ) -> taskflow_core::StoreResult<Option<String>>,
) -> UserResponse {
    let result = open_db(resolve_state_db_path())
        .map_err(|err| err.to_string())
        .and_then(|conn| {
            let mut store = SqliteKvStore::try_new(&conn).map_err(|err| err.to_string())?;
            f(&mut store, &StorageKeys::default()).map_err(|err| err.to_string())
        });

    match result {
        Ok(username) => UserResponse {
            ok: true,
            username,
            message: String::new(),
        },
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error op={operation}");
            UserResponse {
                ok: false,
                username: None,
                message: format!("{operation} failed: {err}"),
            }
        }
    }
}

impl BoardResponse {
    fn snapshot(
        state: &AppState,
        insights: &InsightSummary,
        changed: bool,
        message: impl Into<String>,
    ) -> Self {
        Self {
            ok: true,
            changed,
            message: message.into(),
            tasks: state.tasks.iter().map(to_task_item).collect(),
            completed_log: state.completed_log.iter().map(to_completed_item).collect(),
            activity: state.activity.iter().map(to_activity_item).collect(),
            insights: to_insights_view(insights),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            changed: false,
            message: message.into(),
            tasks: Vec::new(),
            completed_log: Vec::new(),
            activity: Vec::new(),
            insights: to_insights_view(&taskflow_core::compute_insights(&AppState::empty(), 0)),
        }
    }
}

fn resolve_state_db_path() -> PathBuf {
    STATE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("TASKFLOW_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STATE_DB_FILE_NAME)
        })
        .clone()
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id.clone(),
        title: task.title.clone(),
        completed: task.completed,
        created_at: task.created_at,
        completed_at: task.completed_at,
    }
}

fn to_completed_item(entry: &CompletedLogEntry) -> CompletedItem {
    CompletedItem {
        task_id: entry.id.clone(),
        title: entry.title.clone(),
        completed_at: entry.completed_at,
    }
}

fn to_activity_item(entry: &ActivityEntry) -> ActivityItem {
    ActivityItem {
        id: entry.id.clone(),
        kind: entry.kind.as_str().to_string(),
        title: entry.title.clone(),
        at: entry.at,
    }
}

fn to_insights_view(insights: &InsightSummary) -> InsightsView {
    InsightsView {
        total: saturating_u32(insights.total),
        completed_count: saturating_u32(insights.completed_count),
        active_count: saturating_u32(insights.active_count),
        completion_rate: insights.completion_rate,
        completed_today: saturating_u32(insights.completed_today),
        last_completed: insights.last_completed.as_ref().map(to_completed_item),
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
