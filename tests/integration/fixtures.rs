//! Test fixtures for integration tests.
//!
//! Provides helpers for:
//! - A pinned request context
//! - Predefined task batches
//! - Looking up scored tasks by title

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::{json, Value};

use task_analyzer::api::RequestContext;
use task_analyzer::{ScoredTask, TaskInput};

/// The day every fixture is scored on.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

pub fn generated_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

pub fn ctx() -> RequestContext {
    RequestContext::at(today(), generated_at())
}

/// `today()` shifted by `days`, formatted as a request date.
pub fn date(days: i64) -> String {
    (today() + chrono::Duration::days(days)).to_string()
}

/// An Analyze body for the given strategy and task values.
pub fn analyze_body(strategy: &str, tasks: Value) -> String {
    json!({ "strategy": strategy, "tasks": tasks }).to_string()
}

/// A realistic mixed batch: overdue, due today, due later, undated, with one
/// task that unblocks two others.
pub fn mixed_batch() -> Value {
    json!([
        {"id": 1, "title": "Set up database", "due_date": date(2), "estimated_hours": 3, "importance": 8, "dependencies": []},
        {"id": 2, "title": "Build API", "due_date": date(7), "estimated_hours": 6, "importance": 7, "dependencies": [1]},
        {"id": 3, "title": "Write migrations", "due_date": date(4), "estimated_hours": 2, "importance": 6, "dependencies": [1]},
        {"id": 4, "title": "Fix typo in README", "estimated_hours": 0.25, "importance": 2, "dependencies": []},
        {"id": 5, "title": "Renew certificate", "due_date": date(-2), "estimated_hours": 1, "importance": 9, "dependencies": []},
        {"id": 6, "title": "Plan offsite", "due_date": date(45), "estimated_hours": 10, "importance": 4, "dependencies": []}
    ])
}

/// Three tasks depending on each other in a ring, plus one bystander that
/// depends on the ring.
pub fn cyclic_batch() -> Value {
    json!([
        {"id": 1, "title": "A", "dependencies": [3]},
        {"id": 2, "title": "B", "dependencies": [1]},
        {"id": 3, "title": "C", "dependencies": [2]},
        {"id": 4, "title": "Bystander", "dependencies": [1]}
    ])
}

/// `n` independent tasks with varied fields.
pub fn generated_batch(n: usize) -> Vec<TaskInput> {
    (0..n)
        .map(|i| {
            let mut input = TaskInput::new(&format!("task {}", i))
                .with_id(i as i64 + 1)
                .with_hours((i % 12) as f64)
                .with_importance((i % 10) as i64 + 1);
            if i % 3 != 0 {
                input = input.with_due_date(&date((i % 40) as i64 - 5));
            }
            input
        })
        .collect()
}

pub fn by_title<'a>(tasks: &'a [ScoredTask], title: &str) -> &'a ScoredTask {
    tasks
        .iter()
        .find(|t| t.task.title == title)
        .unwrap_or_else(|| panic!("no task titled {:?}", title))
}

/// Scores must be non-increasing and ranks consecutive from 1.
pub fn assert_ranked(tasks: &[ScoredTask]) {
    for pair in tasks.windows(2) {
        assert!(
            pair[0].score >= pair[1].score,
            "{} ({}) ranked above {} ({})",
            pair[0].task.title,
            pair[0].score,
            pair[1].task.title,
            pair[1].score
        );
    }
    for (index, task) in tasks.iter().enumerate() {
        assert_eq!(task.rank, index + 1);
    }
}
