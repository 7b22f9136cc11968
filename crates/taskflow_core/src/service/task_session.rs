//! Session-scoped task state container.
//!
//! # Responsibility
//! - Hold the single in-memory `AppState` for one user session.
//! - Route intents through pure transitions and persist after each change.
//!
//! # Invariants
//! - State is loaded once at `open` and is the source of truth afterwards.
//! - No-op intents never write to storage.
//! - The in-memory state advances even if the following write fails.

use crate::clock::Clock;
use crate::insights::{compute_insights, compute_insights_in, InsightSummary};
use crate::model::state::AppState;
use crate::persist::keys::StorageKeys;
use crate::persist::store::{KeyValueStore, StoreResult};
use crate::persist::{load_state, save_state};
use crate::transition::{apply_intent, Intent};
use chrono::TimeZone;
use log::info;

/// Explicit replacement for an ambient global session state.
pub struct TaskSession<S: KeyValueStore, C: Clock> {
    store: S,
    clock: C,
    state_key: String,
    state: AppState,
}

impl<S: KeyValueStore, C: Clock> TaskSession<S, C> {
    /// Loads `username`'s state from `store` and starts a session.
    pub fn open(store: S, clock: C, keys: &StorageKeys, username: &str) -> Self {
        let state = load_state(&store, keys, username);
        Self {
            store,
            clock,
            state_key: keys.state_key_for(username),
            state,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Key this session writes to.
    pub fn state_key(&self) -> &str {
        &self.state_key
    }

    /// Adds a task. Returns `Ok(false)` for blank titles.
    pub fn add(&mut self, title: &str) -> StoreResult<bool> {
        self.dispatch(Intent::Add {
            title: title.to_string(),
        })
    }

    /// Toggles completion. Returns `Ok(false)` for unknown ids.
    pub fn toggle(&mut self, task_id: &str) -> StoreResult<bool> {
        self.dispatch(Intent::Toggle {
            task_id: task_id.to_string(),
        })
    }

    /// Deletes a task. Returns `Ok(false)` for unknown ids.
    pub fn delete(&mut self, task_id: &str) -> StoreResult<bool> {
        self.dispatch(Intent::Delete {
            task_id: task_id.to_string(),
        })
    }

    /// Applies `intent` at the clock's current time and persists on change.
    pub fn dispatch(&mut self, intent: Intent) -> StoreResult<bool> {
        let now = self.clock.now_ms();
        let Some(next) = apply_intent(&self.state, &intent, now) else {
            info!("event={} module=session status=noop", intent.label());
            return Ok(false);
        };

        self.state = next;
        info!(
            "event={} module=session status=ok tasks={}",
            intent.label(),
            self.state.tasks.len()
        );
        save_state(&mut self.store, &self.state_key, &self.state)?;
        Ok(true)
    }

    /// Insights at the clock's current time in the process-local zone.
    pub fn insights(&self) -> InsightSummary {
        compute_insights(&self.state, self.clock.now_ms())
    }

    /// Insights at the clock's current time in `tz`.
    pub fn insights_in<Tz: TimeZone>(&self, tz: &Tz) -> InsightSummary {
        compute_insights_in(&self.state, self.clock.now_ms(), tz)
    }

    /// Ends the session, returning the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }
}
