//! Persistence entry points over a key-value storage medium.
//!
//! # Responsibility
//! - Load a user's state with legacy-key fallback; never fail to the caller.
//! - Save state as the current schema.
//! - Persist the active username in its own slot.
//!
//! # Invariants
//! - `load_state` always yields a valid state.
//! - The legacy base key is consulted only when the namespaced blob is absent.
//! - Titles and usernames are never written to logs.

pub mod codec;
pub mod keys;
pub mod sqlite_store;
pub mod store;

use crate::model::state::AppState;
use crate::model::task::trim_text;
use codec::{decode_report, encode_state};
use keys::StorageKeys;
use log::{info, warn};
use store::{KeyValueStore, StoreResult};

/// Loads the state stored for `username`.
///
/// Read failures are logged and treated like an absent blob.
pub fn load_state<S: KeyValueStore + ?Sized>(
    store: &S,
    keys: &StorageKeys,
    username: &str,
) -> AppState {
    let state_key = keys.state_key_for(username);

    let (raw, source) = match read_blob(store, &state_key) {
        Some(raw) => (raw, "namespaced"),
        None if state_key != keys.state_base => match read_blob(store, &keys.state_base) {
            Some(raw) => (raw, "legacy"),
            None => return loaded_default(),
        },
        None => return loaded_default(),
    };

    let report = decode_report(&raw);
    if report.status.is_fallback() {
        warn!(
            "event=state_load module=persist status=fallback source={source} reason={}",
            report.status.as_str()
        );
    } else {
        info!(
            "event=state_load module=persist status=ok source={source} schema={} tasks={} log={} activity={}",
            report.status.as_str(),
            report.state.tasks.len(),
            report.state.completed_log.len(),
            report.state.activity.len()
        );
    }
    report.state
}

/// Encodes `state` and writes it under `state_key`.
pub fn save_state<S: KeyValueStore + ?Sized>(
    store: &mut S,
    state_key: &str,
    state: &AppState,
) -> StoreResult<()> {
    let blob = encode_state(state)?;
    store.set(state_key, &blob)?;
    info!(
        "event=state_save module=persist status=ok bytes={} tasks={}",
        blob.len(),
        state.tasks.len()
    );
    Ok(())
}

/// Reads the active username; blank or missing values yield `None`.
pub fn load_active_user<S: KeyValueStore + ?Sized>(
    store: &S,
    keys: &StorageKeys,
) -> StoreResult<Option<String>> {
    let stored = store.get(&keys.active_user)?;
    Ok(stored
        .map(|value| trim_text(&value).to_string())
        .filter(|value| !value.is_empty()))
}

/// Stores the trimmed active username; a blank name clears the slot.
pub fn save_active_user<S: KeyValueStore + ?Sized>(
    store: &mut S,
    keys: &StorageKeys,
    username: &str,
) -> StoreResult<()> {
    let trimmed = trim_text(username);
    if trimmed.is_empty() {
        return clear_active_user(store, keys);
    }
    store.set(&keys.active_user, trimmed)?;
    info!("event=active_user_set module=persist status=ok");
    Ok(())
}

/// Removes the active-user slot entirely.
pub fn clear_active_user<S: KeyValueStore + ?Sized>(
    store: &mut S,
    keys: &StorageKeys,
) -> StoreResult<()> {
    store.remove(&keys.active_user)?;
    info!("event=active_user_clear module=persist status=ok");
    Ok(())
}

fn read_blob<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(err) => {
            warn!(
                "event=state_load module=persist status=error error_code=store_read_failed error={}",
                err
            );
            None
        }
    }
}

fn loaded_default() -> AppState {
    info!("event=state_load module=persist status=ok source=default");
    AppState::empty()
}
