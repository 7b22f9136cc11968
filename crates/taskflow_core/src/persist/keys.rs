//! Storage key scheme.
//!
//! # Responsibility
//! - Derive per-user namespaced keys for task state.
//! - Hold the fixed key of the active-user slot.
//!
//! # Invariants
//! - Usernames are trimmed and lower-cased before use.
//! - A blank username maps to the un-namespaced base key.

use crate::model::task::trim_text;

/// Default base key for task state.
pub const DEFAULT_STATE_BASE_KEY: &str = "taskflow.state";
/// Default key holding the active username.
pub const DEFAULT_ACTIVE_USER_KEY: &str = "taskflow.active_user";

/// Configurable key names used by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    /// Un-namespaced key; also the legacy single-user location.
    pub state_base: String,
    pub active_user: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            state_base: DEFAULT_STATE_BASE_KEY.to_string(),
            active_user: DEFAULT_ACTIVE_USER_KEY.to_string(),
        }
    }
}

impl StorageKeys {
    /// Returns the task-state key for `username`.
    ///
    /// `"<state_base>:<normalized>"`, or `state_base` when the name is blank.
    pub fn state_key_for(&self, username: &str) -> String {
        match normalize_username(username) {
            Some(name) => format!("{}:{name}", self.state_base),
            None => self.state_base.clone(),
        }
    }
}

/// Trims and lower-cases a username; blank input yields `None`.
pub fn normalize_username(username: &str) -> Option<String> {
    let trimmed = trim_text(username);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}
