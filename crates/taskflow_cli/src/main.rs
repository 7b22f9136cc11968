//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `taskflow_core` linkage and run one deterministic session.
//! - Exercise the SQLite store path without any UI runtime.

use taskflow_core::db::open_db_in_memory;
use taskflow_core::{ManualClock, SqliteKvStore, StorageKeys, TaskSession};

const SMOKE_START_MS: i64 = 1_700_000_000_000;

fn main() {
    println!("taskflow_core ping={}", taskflow_core::ping());
    println!("taskflow_core version={}", taskflow_core::core_version());

    if let Err(err) = run_smoke_session() {
        eprintln!("taskflow_core smoke=error error={err}");
        std::process::exit(1);
    }
}

fn run_smoke_session() -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db_in_memory()?;
    let store = SqliteKvStore::try_new(&conn)?;
    let clock = ManualClock::new(SMOKE_START_MS);
    let mut session = TaskSession::open(store, &clock, &StorageKeys::default(), "smoke");

    session.add("first smoke task")?;
    clock.advance(1_000);
    session.add("second smoke task")?;
    let newest = session
        .state()
        .tasks
        .first()
        .map(|task| task.id.clone())
        .ok_or("smoke session lost its tasks")?;
    clock.advance(1_000);
    session.toggle(&newest)?;

    let summary = session.insights();
    println!(
        "taskflow_core smoke=ok total={} completed={} rate={} activity={}",
        summary.total,
        summary.completed_count,
        summary.completion_rate,
        session.state().activity.len()
    );
    Ok(())
}
