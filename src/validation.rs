//! Input validation for analysis batches.
//!
//! Turns raw `TaskInput`s into validated `Task`s before any scoring stage
//! runs. A batch is accepted or rejected as a whole; the first problem found
//! is reported together with the task and field it concerns.
//!
//! Checks, in order:
//! 1. Every id is positive (missing ids take the task's 1-based position)
//! 2. No duplicate ids
//! 3. Title present and non-blank
//! 4. Importance within 1-10
//! 5. Estimated hours finite and non-negative
//! 6. Due date parses as `YYYY-MM-DD`
//! 7. Dependencies reference other tasks of the same batch

use std::collections::HashSet;

use chrono::NaiveDate;
use thiserror::Error;

use crate::core::task::{DEFAULT_ESTIMATED_HOURS, DEFAULT_IMPORTANCE};
use crate::core::{Task, TaskId, TaskInput};

/// Smallest accepted importance.
pub const MIN_IMPORTANCE: i64 = 1;
/// Largest accepted importance.
pub const MAX_IMPORTANCE: i64 = 10;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A rejected batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("task at position {position} has invalid id {value} (ids must be positive)")]
    InvalidId { position: usize, value: i64 },

    #[error("duplicate task id {0}")]
    DuplicateId(TaskId),

    #[error("task {task} is missing a title")]
    MissingTitle { task: TaskId },

    #[error("task {task} has importance {value} (expected 1-10)")]
    ImportanceOutOfRange { task: TaskId, value: i64 },

    #[error("task {task} has invalid estimated_hours {value} (expected a non-negative number)")]
    NegativeHours { task: TaskId, value: f64 },

    #[error("task {task} has invalid due_date '{value}' (expected YYYY-MM-DD)")]
    InvalidDueDate { task: TaskId, value: String },

    #[error("task {task} references unknown id {dependency}")]
    UnknownDependency { task: TaskId, dependency: i64 },

    #[error("task {task} cannot depend on itself")]
    SelfDependency { task: TaskId },

    #[error("unknown strategy '{0}' (expected one of smart_balance, fastest_wins, high_impact, deadline_driven)")]
    UnknownStrategy(String),
}

impl ValidationError {
    /// The task the error concerns, when it concerns a single task.
    pub fn task(&self) -> Option<TaskId> {
        match self {
            ValidationError::DuplicateId(task)
            | ValidationError::MissingTitle { task }
            | ValidationError::ImportanceOutOfRange { task, .. }
            | ValidationError::NegativeHours { task, .. }
            | ValidationError::InvalidDueDate { task, .. }
            | ValidationError::UnknownDependency { task, .. }
            | ValidationError::SelfDependency { task } => Some(*task),
            ValidationError::InvalidId { .. } | ValidationError::UnknownStrategy(_) => None,
        }
    }
}

/// Validates a batch and applies request defaults.
///
/// Returns the validated tasks in input order, or the first error found.
/// An empty batch is valid.
pub fn validate_tasks(inputs: &[TaskInput]) -> Result<Vec<Task>, ValidationError> {
    let ids = resolve_ids(inputs)?;
    let known: HashSet<i64> = ids.iter().map(|id| id.0 as i64).collect();

    inputs
        .iter()
        .zip(&ids)
        .map(|(input, &id)| validate_task(input, id, &known))
        .collect()
}

fn resolve_ids(inputs: &[TaskInput]) -> Result<Vec<TaskId>, ValidationError> {
    let mut seen = HashSet::new();
    let mut ids = Vec::with_capacity(inputs.len());

    for (index, input) in inputs.iter().enumerate() {
        let position = index + 1;
        let value = input.id.unwrap_or(position as i64);
        if value <= 0 {
            return Err(ValidationError::InvalidId { position, value });
        }
        let id = TaskId(value as u64);
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateId(id));
        }
        ids.push(id);
    }

    Ok(ids)
}

fn validate_task(input: &TaskInput, id: TaskId, known: &HashSet<i64>) -> Result<Task, ValidationError> {
    let title = input
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(ValidationError::MissingTitle { task: id })?
        .to_string();

    let importance = input.importance.unwrap_or(DEFAULT_IMPORTANCE as i64);
    if !(MIN_IMPORTANCE..=MAX_IMPORTANCE).contains(&importance) {
        return Err(ValidationError::ImportanceOutOfRange {
            task: id,
            value: importance,
        });
    }

    let estimated_hours = input.estimated_hours.unwrap_or(DEFAULT_ESTIMATED_HOURS);
    if !estimated_hours.is_finite() || estimated_hours < 0.0 {
        return Err(ValidationError::NegativeHours {
            task: id,
            value: estimated_hours,
        });
    }

    let due_date = parse_due_date(input.due_date.as_deref())
        .map_err(|value| ValidationError::InvalidDueDate { task: id, value })?;

    let mut dependencies: Vec<TaskId> = Vec::new();
    for &dep in input.dependencies.as_deref().unwrap_or_default() {
        if dep == id.0 as i64 {
            return Err(ValidationError::SelfDependency { task: id });
        }
        if !known.contains(&dep) {
            return Err(ValidationError::UnknownDependency {
                task: id,
                dependency: dep,
            });
        }
        let dep = TaskId(dep as u64);
        // The list is a set: repeated ids add no extra edge.
        if !dependencies.contains(&dep) {
            dependencies.push(dep);
        }
    }

    Ok(Task {
        id,
        title,
        due_date,
        estimated_hours,
        importance: importance as u8,
        dependencies,
    })
}

/// Parses an optional `YYYY-MM-DD` date. Blank strings mean "no due date".
///
/// On failure the offending text is returned as the error.
pub fn parse_due_date(raw: Option<&str>) -> Result<Option<NaiveDate>, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map(Some)
            .map_err(|_| text.to_string()),
    }
}
