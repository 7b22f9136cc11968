use chrono::{FixedOffset, TimeZone, Utc};
use taskflow_core::{add_task, compute_insights, compute_insights_in, toggle_task, AppState};

fn millis<Tz: TimeZone>(tz: &Tz, y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
    tz.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .unwrap()
        .timestamp_millis()
}

#[test]
fn empty_state_has_zero_rate() {
    let summary = compute_insights(&AppState::empty(), 0);

    assert_eq!(summary.total, 0);
    assert_eq!(summary.completed_count, 0);
    assert_eq!(summary.active_count, 0);
    assert_eq!(summary.completion_rate, 0);
    assert_eq!(summary.completed_today, 0);
    assert_eq!(summary.last_completed, None);
}

#[test]
fn one_of_three_completed_rounds_to_33() {
    let mut state = AppState::empty();
    for (title, now) in [("a", 1), ("b", 2), ("c", 3)] {
        state = add_task(&state, title, now);
    }
    let id = state.tasks[0].id.clone();
    state = toggle_task(&state, &id, 4);

    let summary = compute_insights_in(&state, 5, &Utc);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.completed_count, 1);
    assert_eq!(summary.active_count, 2);
    assert_eq!(summary.completion_rate, 33);
    assert_eq!(summary.last_completed.unwrap().title, "c");
}

#[test]
fn completed_today_uses_local_calendar_day_of_zone() {
    let tz = FixedOffset::east_opt(9 * 3600).unwrap();
    let yesterday_late = millis(&tz, 2026, 3, 9, 23, 50);
    let today_early = millis(&tz, 2026, 3, 10, 0, 10);
    let now = millis(&tz, 2026, 3, 10, 12, 0);

    let mut state = add_task(&AppState::empty(), "a", 0);
    state = add_task(&state, "b", 1);
    let (b_id, a_id) = (state.tasks[0].id.clone(), state.tasks[1].id.clone());
    state = toggle_task(&state, &a_id, yesterday_late);
    state = toggle_task(&state, &b_id, today_early);

    let local = compute_insights_in(&state, now, &tz);
    assert_eq!(local.completed_today, 1);
    assert_eq!(local.last_completed.unwrap().title, "b");

    // In UTC both completions fall on 2026-03-09 while "now" is 2026-03-10.
    let utc = compute_insights_in(&state, now, &Utc);
    assert_eq!(utc.completed_today, 0);
}

#[test]
fn completed_today_counts_log_entries_of_deleted_tasks() {
    let mut state = add_task(&AppState::empty(), "a", 0);
    let id = state.tasks[0].id.clone();
    state = toggle_task(&state, &id, 1_000);
    state = taskflow_core::delete_task(&state, &id, 2_000);

    let summary = compute_insights_in(&state, 3_000, &Utc);
    assert_eq!(summary.total, 0);
    assert_eq!(summary.completion_rate, 0);
    assert_eq!(summary.completed_today, 1);
}
