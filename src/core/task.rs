//! Task data model for a single analysis batch.
//!
//! `TaskInput` is the loosely-typed shape a caller submits; `Task` is the
//! validated record every pipeline stage reads. Tasks are never mutated once
//! validated.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier of a task within one batch.
///
/// Ids are supplied by the caller (or derived from batch position when
/// omitted) and are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// A task exactly as it arrives in a request body.
///
/// Every field is optional here so that validation can report precisely which
/// field of which task is wrong instead of failing inside the JSON decoder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskInput {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub importance: Option<i64>,
    #[serde(default)]
    pub dependencies: Option<Vec<i64>>,
}

impl TaskInput {
    pub fn new(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_due_date(mut self, due: &str) -> Self {
        self.due_date = Some(due.to_string());
        self
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    pub fn with_importance(mut self, importance: i64) -> Self {
        self.importance = Some(importance);
        self
    }

    pub fn with_dependencies(mut self, deps: &[i64]) -> Self {
        self.dependencies = Some(deps.to_vec());
        self
    }
}

/// A validated task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier within the batch.
    pub id: TaskId,
    /// Trimmed, non-empty title.
    pub title: String,
    /// Optional calendar due date.
    pub due_date: Option<NaiveDate>,
    /// Non-negative effort estimate in hours.
    pub estimated_hours: f64,
    /// Importance on a 1-10 scale.
    pub importance: u8,
    /// Ids of tasks that must be finished before this one.
    pub dependencies: Vec<TaskId>,
}

impl Task {
    /// Create a task with the validation defaults (2h, importance 5, undated).
    pub fn new(id: u64, title: &str) -> Self {
        Self {
            id: TaskId(id),
            title: title.to_string(),
            due_date: None,
            estimated_hours: DEFAULT_ESTIMATED_HOURS,
            importance: DEFAULT_IMPORTANCE,
            dependencies: Vec::new(),
        }
    }

    pub fn due(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    pub fn hours(mut self, hours: f64) -> Self {
        self.estimated_hours = hours;
        self
    }

    pub fn importance(mut self, importance: u8) -> Self {
        self.importance = importance;
        self
    }

    pub fn depends_on(mut self, id: u64) -> Self {
        self.dependencies.push(TaskId(id));
        self
    }
}

/// Effort assumed when a request omits `estimated_hours`.
pub const DEFAULT_ESTIMATED_HOURS: f64 = 2.0;

/// Importance assumed when a request omits `importance`.
pub const DEFAULT_IMPORTANCE: u8 = 5;
