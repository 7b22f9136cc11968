//! Derived productivity metrics.
//!
//! # Responsibility
//! - Aggregate read-only counters over the current state on demand.
//!
//! # Invariants
//! - No caching; every call recomputes from the given state.
//! - `completion_rate` is 0 for an empty task list.
//! - "Today" is the local calendar day of `now` in the supplied time zone.

use crate::model::history::CompletedLogEntry;
use crate::model::state::AppState;
use chrono::{Local, NaiveDate, TimeZone};

/// Summary counters shown next to the task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightSummary {
    pub total: usize,
    pub completed_count: usize,
    pub active_count: usize,
    /// Percentage in `0..=100`, rounded half up.
    pub completion_rate: u32,
    pub completed_today: usize,
    pub last_completed: Option<CompletedLogEntry>,
}

/// Computes insights using the process-local time zone.
pub fn compute_insights(state: &AppState, now: i64) -> InsightSummary {
    compute_insights_in(state, now, &Local)
}

/// Computes insights, bucketing "today" in `tz`.
pub fn compute_insights_in<Tz: TimeZone>(state: &AppState, now: i64, tz: &Tz) -> InsightSummary {
    let total = state.tasks.len();
    let completed_count = state.tasks.iter().filter(|task| task.completed).count();
    let today = local_day(now, tz);
    let completed_today = match today {
        Some(day) => state
            .completed_log
            .iter()
            .filter(|entry| local_day(entry.completed_at, tz) == Some(day))
            .count(),
        None => 0,
    };

    InsightSummary {
        total,
        completed_count,
        active_count: total - completed_count,
        completion_rate: completion_rate(completed_count, total),
        completed_today,
        last_completed: state.completed_log.first().cloned(),
    }
}

/// `round(completed / total * 100)` in integer arithmetic; 0 when `total == 0`.
pub fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let completed = completed as u64;
    let total = total as u64;
    let rounded = (completed * 200 + total) / (total * 2);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

fn local_day<Tz: TimeZone>(epoch_ms: i64, tz: &Tz) -> Option<NaiveDate> {
    tz.timestamp_millis_opt(epoch_ms)
        .earliest()
        .map(|moment| moment.date_naive())
}
