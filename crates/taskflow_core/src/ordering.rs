//! Display/persistence ordering policy.
//!
//! # Responsibility
//! - Define the total order over tasks and the orders over history lists.
//! - Provide sorted insertion used by transitions and normalization sorts
//!   used by decode.
//!
//! # Invariants
//! - Tasks: `created_at` DESC, then `id` DESC (byte-wise string order).
//! - Completed log: `completed_at` DESC only; ties keep relative order.
//! - Activity: `at` DESC, then `id` DESC.

use crate::model::history::{ActivityEntry, CompletedLogEntry};
use crate::model::task::Task;
use std::cmp::Ordering;

/// Canonical newest-first task comparator.
pub fn compare_tasks(a: &Task, b: &Task) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.as_str().cmp(a.id.as_str()))
}

/// Completed-log comparator (no tie-break).
pub fn compare_completed(a: &CompletedLogEntry, b: &CompletedLogEntry) -> Ordering {
    b.completed_at.cmp(&a.completed_at)
}

/// Activity comparator.
pub fn compare_activity(a: &ActivityEntry, b: &ActivityEntry) -> Ordering {
    b.at.cmp(&a.at).then_with(|| b.id.as_str().cmp(a.id.as_str()))
}

/// Re-sorts tasks into canonical order.
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(compare_tasks);
}

/// Re-sorts the completed log; stable, so ties keep their stored order.
pub fn sort_completed_log(entries: &mut [CompletedLogEntry]) {
    entries.sort_by(compare_completed);
}

/// Re-sorts the activity feed.
pub fn sort_activity(entries: &mut [ActivityEntry]) {
    entries.sort_by(compare_activity);
}

/// Inserts `task` at its canonical position.
pub fn insert_task(tasks: &mut Vec<Task>, task: Task) {
    let index = insertion_index(tasks, &task, compare_tasks);
    tasks.insert(index, task);
}

/// Inserts `entry` ahead of any entry with an equal key, then trims to `cap`.
pub fn insert_completed(
    entries: &mut Vec<CompletedLogEntry>,
    entry: CompletedLogEntry,
    cap: usize,
) {
    let index = insertion_index(entries, &entry, compare_completed);
    entries.insert(index, entry);
    entries.truncate(cap);
}

/// Inserts `entry` at its canonical activity position, then trims to `cap`.
pub fn insert_activity(entries: &mut Vec<ActivityEntry>, entry: ActivityEntry, cap: usize) {
    let index = insertion_index(entries, &entry, compare_activity);
    entries.insert(index, entry);
    entries.truncate(cap);
}

// First position whose element does not sort strictly before `item`.
fn insertion_index<T>(items: &[T], item: &T, compare: fn(&T, &T) -> Ordering) -> usize {
    items.partition_point(|existing| compare(existing, item) == Ordering::Less)
}

#[cfg(test)]
mod tests {
    use super::{compare_tasks, insert_activity, insert_completed, insert_task};
    use crate::model::history::{ActivityEntry, ActivityKind, CompletedLogEntry};
    use crate::model::task::{create_task, Task};
    use std::cmp::Ordering;

    fn task(id: &str, created_at: i64) -> Task {
        create_task(id, "t", created_at).expect("non-empty title")
    }

    #[test]
    fn tasks_tie_break_on_id_descending() {
        let a = task("1000-2", 1_000);
        let b = task("1000-10", 1_000);
        // "1000-2" > "1000-10" byte-wise.
        assert_eq!(compare_tasks(&a, &b), Ordering::Less);
    }

    #[test]
    fn insert_task_keeps_newest_first() {
        let mut tasks = vec![task("c", 30), task("a", 10)];
        insert_task(&mut tasks, task("b", 20));
        let ids: Vec<_> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["c", "b", "a"]);
    }

    #[test]
    fn completed_insert_goes_ahead_of_equal_timestamps_and_caps() {
        let entry = |id: &str, at: i64| CompletedLogEntry {
            id: id.to_string(),
            title: "t".to_string(),
            completed_at: at,
        };
        let mut log = vec![entry("old", 5), entry("older", 1)];
        insert_completed(&mut log, entry("new", 5), 2);
        let ids: Vec<_> = log.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["new", "old"]);
    }

    #[test]
    fn activity_insert_respects_cap() {
        let mut feed = Vec::new();
        for at in 0..5 {
            insert_activity(
                &mut feed,
                ActivityEntry::record(ActivityKind::Added, "x", "t", at),
                3,
            );
        }
        let ats: Vec<_> = feed.iter().map(|e| e.at).collect();
        assert_eq!(ats, [4, 3, 2]);
    }
}
