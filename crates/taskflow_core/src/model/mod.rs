//! Task-tracking domain model.
//!
//! # Responsibility
//! - Define the canonical records held by the application state container.
//! - Keep constructors pure so transitions stay side-effect free.
//!
//! # Invariants
//! - A `Task` never carries an empty-after-trim title.
//! - `Task::completed_at` is present if and only if `Task::completed` is true.
//! - History records (`CompletedLogEntry`, `ActivityEntry`) are immutable snapshots.

pub mod history;
pub mod state;
pub mod task;
