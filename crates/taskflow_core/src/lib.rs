//! Core task-state engine for TaskFlow.
//! This crate is the single source of truth for task, history and storage invariants.

pub mod clock;
pub mod db;
pub mod insights;
pub mod logging;
pub mod model;
pub mod ordering;
pub mod persist;
pub mod service;
pub mod transition;

pub use clock::{Clock, ManualClock, SystemClock};
pub use insights::{compute_insights, compute_insights_in, InsightSummary};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::history::{ActivityEntry, ActivityKind, CompletedLogEntry};
pub use model::state::{AppState, ACTIVITY_CAP, COMPLETED_LOG_CAP};
pub use model::task::{create_task, Task, TaskId};
pub use persist::codec::{decode_state, encode_state, CURRENT_SCHEMA_VERSION};
pub use persist::keys::StorageKeys;
pub use persist::sqlite_store::SqliteKvStore;
pub use persist::store::{KeyValueStore, MemoryStore, StoreError, StoreResult};
pub use persist::{clear_active_user, load_active_user, load_state, save_active_user, save_state};
pub use service::task_session::TaskSession;
pub use transition::{add_task, apply_intent, delete_task, toggle_task, Intent};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
