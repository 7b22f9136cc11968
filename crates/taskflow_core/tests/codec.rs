use proptest::prelude::*;
use serde_json::json;
use taskflow_core::persist::codec::{decode_report, DecodeStatus};
use taskflow_core::{
    add_task, decode_state, delete_task, encode_state, toggle_task, ActivityKind, AppState,
    ACTIVITY_CAP,
};

fn decode_value(value: serde_json::Value) -> AppState {
    decode_state(Some(&value.to_string()))
}

fn sample_state() -> AppState {
    let mut state = AppState::empty();
    for (title, now) in [("Buy milk", 1_000), ("Write report", 1_500), ("Call mom", 1_500)] {
        state = add_task(&state, title, now);
    }
    let report = state.tasks[1].id.clone();
    let milk = state.tasks[2].id.clone();
    state = toggle_task(&state, &report, 2_000);
    state = toggle_task(&state, &milk, 2_500);
    state = toggle_task(&state, &milk, 2_600);
    delete_task(&state, &report, 3_000)
}

#[test]
fn roundtrip_reproduces_valid_state() {
    let state = sample_state();
    let blob = encode_state(&state).unwrap();
    assert_eq!(decode_state(Some(&blob)), state);
}

#[test]
fn absent_and_malformed_blobs_yield_empty_state() {
    assert_eq!(decode_state(None), AppState::empty());
    assert_eq!(decode_state(Some("")), AppState::empty());
    assert_eq!(decode_state(Some("{not json")), AppState::empty());
    assert_eq!(decode_report("{not json").status, DecodeStatus::Unparsable);
}

#[test]
fn missing_or_non_numeric_version_yields_empty_state() {
    let tasks = json!([{"id": "a", "title": "x", "completed": false, "createdAt": 5}]);

    let missing = decode_report(&json!({"sequence": 3, "tasks": tasks}).to_string());
    assert_eq!(missing.status, DecodeStatus::MissingVersion);
    assert_eq!(missing.state, AppState::empty());

    let textual = decode_report(&json!({"version": "2", "tasks": tasks}).to_string());
    assert_eq!(textual.status, DecodeStatus::MissingVersion);
    assert_eq!(textual.state, AppState::empty());
}

#[test]
fn unknown_versions_are_not_partially_recovered() {
    for version in [json!(0), json!(3), json!(2.5), json!(-1)] {
        let report = decode_report(
            &json!({
                "version": version,
                "sequence": 9,
                "tasks": [{"id": "a", "title": "x", "completed": false, "createdAt": 5}]
            })
            .to_string(),
        );
        assert_eq!(report.status, DecodeStatus::UnsupportedVersion);
        assert_eq!(report.state, AppState::empty());
    }
}

#[test]
fn legacy_blob_with_todos_field_decodes_tasks_only() {
    let raw = r#"{"version":1,"sequence":2,"todos":[{"id":"a","title":"x","completed":false,"createdAt":5}]}"#;
    let report = decode_report(raw);

    assert_eq!(report.status, DecodeStatus::Legacy);
    assert_eq!(report.state.tasks.len(), 1);
    assert_eq!(report.state.tasks[0].title, "x");
    assert_eq!(report.state.sequence, 2);
    assert!(report.state.completed_log.is_empty());
    assert!(report.state.activity.is_empty());
}

#[test]
fn legacy_blob_ignores_history_fields() {
    let state = decode_value(json!({
        "version": 1,
        "sequence": 1,
        "tasks": [{"id": "a", "title": "x", "completed": true, "createdAt": 5, "completedAt": 6}],
        "completedLog": [{"id": "a", "title": "x", "completedAt": 6}],
        "activity": [{"id": "6-a-completed", "type": "completed", "title": "x", "at": 6}]
    }));

    assert_eq!(state.tasks.len(), 1);
    assert_eq!(state.tasks[0].completed_at, Some(6));
    assert!(state.completed_log.is_empty());
    assert!(state.activity.is_empty());
}

#[test]
fn legacy_decode_reencode_decode_is_stable() {
    let raw = json!({
        "version": 1,
        "sequence": 4,
        "todos": [
            {"id": "1-1", "title": " old ", "completed": false, "createdAt": 1},
            {"id": "2-2", "title": "newer", "completed": true, "createdAt": 2, "completedAt": 3}
        ]
    })
    .to_string();

    let first = decode_state(Some(&raw));
    let second = decode_state(Some(&encode_state(&first).unwrap()));

    assert_eq!(first, second);
    assert_eq!(second.sequence, 4);
    assert_eq!(second.tasks[1].title, "old");
    assert!(second.completed_log.is_empty());
    assert!(second.activity.is_empty());
}

#[test]
fn task_records_are_coerced_individually() {
    let state = decode_value(json!({
        "version": 2,
        "sequence": 10,
        "tasks": [
            {"id": "ok", "title": "  keep  ", "completed": false, "createdAt": 1, "completedAt": 99},
            {"id": "done", "title": "done", "completed": true, "createdAt": 2, "completedAt": 7},
            {"id": "done-no-time", "title": "d", "completed": true, "createdAt": 3, "completedAt": "7"},
            {"id": 5, "title": "numeric id", "completed": false, "createdAt": 1},
            {"id": "blank", "title": "   ", "completed": false, "createdAt": 1},
            {"id": "str-flag", "title": "t", "completed": "false", "createdAt": 1},
            {"id": "no-created", "title": "t", "completed": false},
            {"id": "text-created", "title": "t", "completed": false, "createdAt": "1"},
            "not an object",
            null
        ]
    }));

    let ids: Vec<_> = state.tasks.iter().map(|task| task.id.as_str()).collect();
    assert_eq!(ids, ["done-no-time", "done", "ok"]);
    assert_eq!(state.tasks[2].title, "keep");
    assert_eq!(state.tasks[2].completed_at, None);
    assert_eq!(state.tasks[1].completed_at, Some(7));
    assert_eq!(state.tasks[0].completed_at, None);
}

#[test]
fn out_of_range_numbers_drop_only_their_record() {
    let raw = r#"{
        "version": 2,
        "sequence": 1e400,
        "tasks": [
            {"id": "good", "title": "keep me", "completed": false, "createdAt": 5},
            {"id": "bad", "title": "overflow", "completed": false, "createdAt": 1e400},
            {"id": "late", "title": "done", "completed": true, "createdAt": 6, "completedAt": -1e400}
        ],
        "completedLog": [
            {"id": "good", "title": "kept", "completedAt": 7},
            {"id": "bad", "title": "overflow", "completedAt": 1e999}
        ],
        "activity": [
            {"id": "5-good-added", "type": "added", "title": "keep me", "at": 5},
            {"id": "x-bad-added", "type": "added", "title": "overflow", "at": 1e400}
        ]
    }"#;
    let report = decode_report(raw);

    assert_eq!(report.status, DecodeStatus::Current);
    let ids: Vec<_> = report.state.tasks.iter().map(|task| task.id.as_str()).collect();
    assert_eq!(ids, ["late", "good"]);
    assert_eq!(report.state.tasks[0].completed_at, None);
    assert_eq!(report.state.sequence, 0);
    assert_eq!(report.state.completed_log.len(), 1);
    assert_eq!(report.state.completed_log[0].title, "kept");
    assert_eq!(report.state.activity.len(), 1);
    assert_eq!(report.state.activity[0].id, "5-good-added");
}

#[test]
fn byte_order_mark_titles_are_blank() {
    let state = decode_value(json!({
        "version": 2,
        "sequence": 1,
        "tasks": [
            {"id": "bom", "title": "\u{FEFF}", "completed": false, "createdAt": 1},
            {"id": "ok", "title": "\u{FEFF}real\u{FEFF}", "completed": false, "createdAt": 2}
        ],
        "completedLog": [{"id": "bom", "title": " \u{FEFF} ", "completedAt": 3}]
    }));

    assert_eq!(state.tasks.len(), 1);
    assert_eq!(state.tasks[0].title, "real");
    assert!(state.completed_log.is_empty());
}

#[test]
fn decoded_tasks_are_resorted() {
    let state = decode_value(json!({
        "version": 2,
        "sequence": 3,
        "tasks": [
            {"id": "a", "title": "a", "completed": false, "createdAt": 1},
            {"id": "c", "title": "c", "completed": false, "createdAt": 5},
            {"id": "b", "title": "b", "completed": false, "createdAt": 5}
        ]
    }));

    let ids: Vec<_> = state.tasks.iter().map(|task| task.id.as_str()).collect();
    assert_eq!(ids, ["c", "b", "a"]);
}

#[test]
fn history_records_are_coerced_and_sorted() {
    let state = decode_value(json!({
        "version": 2,
        "sequence": 0,
        "tasks": [],
        "completedLog": [
            {"id": "a", "title": "first", "completedAt": 5},
            {"id": "b", "title": " ", "completedAt": 6},
            {"id": "c", "title": "newest", "completedAt": 8},
            {"id": "d", "title": "second", "completedAt": 5},
            {"id": "e", "title": "no time"}
        ],
        "activity": [
            {"id": "1-a-added", "type": "added", "title": "a", "at": 1},
            {"id": "2-a-archived", "type": "archived", "title": "a", "at": 2},
            {"id": "3-a-deleted", "type": "deleted", "title": "a", "at": 3},
            {"id": "3-b-added", "type": "added", "title": "b", "at": 3},
            {"id": "4-a-completed", "type": "completed", "title": "", "at": 4}
        ]
    }));

    let log: Vec<_> = state.completed_log.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(log, ["newest", "first", "second"]);

    let activity: Vec<_> = state.activity.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(activity, ["3-b-added", "3-a-deleted", "1-a-added"]);
    assert_eq!(state.activity[1].kind, ActivityKind::Deleted);
}

#[test]
fn decoded_activity_is_capped_but_completed_log_is_not() {
    let activity: Vec<_> = (0..ACTIVITY_CAP as i64 + 50)
        .map(|at| json!({"id": format!("{at}-x-added"), "type": "added", "title": "x", "at": at}))
        .collect();
    let log: Vec<_> = (0..400)
        .map(|at| json!({"id": "x", "title": "x", "completedAt": at}))
        .collect();

    let state = decode_value(json!({
        "version": 2,
        "sequence": 1,
        "tasks": [],
        "completedLog": log,
        "activity": activity
    }));

    assert_eq!(state.activity.len(), ACTIVITY_CAP);
    assert_eq!(state.activity[0].at, ACTIVITY_CAP as i64 + 49);
    assert_eq!(state.completed_log.len(), 400);
}

#[test]
fn sequence_defaults_to_zero_when_invalid() {
    for sequence in [json!(null), json!("7"), json!([])] {
        let state = decode_value(json!({"version": 2, "sequence": sequence, "tasks": []}));
        assert_eq!(state.sequence, 0);
    }
    let missing = decode_value(json!({"version": 2}));
    assert_eq!(missing, AppState::empty());
}

#[test]
fn non_array_collections_decode_as_empty() {
    let state = decode_value(json!({
        "version": 2,
        "sequence": 2,
        "tasks": {"id": "a"},
        "completedLog": "nope",
        "activity": 4
    }));

    assert_eq!(state.sequence, 2);
    assert!(state.tasks.is_empty());
    assert!(state.completed_log.is_empty());
    assert!(state.activity.is_empty());
}

fn intents() -> impl Strategy<Value = Vec<(u8, String, i64)>> {
    prop::collection::vec((0_u8..3, "[ a-z]{0,6}", 0_i64..5), 0..40)
}

proptest! {
    #[test]
    fn encode_decode_roundtrip_for_reachable_states(steps in intents()) {
        let mut state = AppState::empty();
        let mut now = 0;
        for (op, title, delta) in steps {
            now += delta;
            let target = state
                .tasks
                .get(title.len() % state.tasks.len().max(1))
                .map(|task| task.id.clone());
            state = match (op, target) {
                (0, _) => add_task(&state, &title, now),
                (1, Some(task_id)) => toggle_task(&state, &task_id, now),
                (_, Some(task_id)) => delete_task(&state, &task_id, now),
                (_, None) => state,
            };
        }

        let blob = encode_state(&state).unwrap();
        prop_assert_eq!(decode_state(Some(&blob)), state);
    }
}
