//! Per-task normalisation into dimensionless [0, 1] components.
//!
//! Nothing here looks at other tasks of the batch; the dependency component
//! is attached afterwards from the batch-wide analysis.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::Task;

/// Days over which urgency decays linearly from 1 to 0.
pub const URGENCY_WINDOW_DAYS: i64 = 30;

/// Urgency of work that has no due date.
pub const UNDATED_URGENCY: f64 = 0.1;

/// Effort at or above which a task stops being any kind of quick win.
pub const MAX_EFFORT_HOURS: f64 = 8.0;

/// Urgency score together with the signed day distance it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Urgency {
    pub score: f64,
    /// Days until due; negative when overdue, `None` when undated.
    pub days_left: Option<i64>,
}

/// Urgency of a due date as seen from `today`.
///
/// Undated work gets a small constant, anything due today or earlier is
/// maximally urgent, and later dates decay linearly to 0 at the window edge.
pub fn urgency(due: Option<NaiveDate>, today: NaiveDate) -> Urgency {
    let Some(due) = due else {
        return Urgency {
            score: UNDATED_URGENCY,
            days_left: None,
        };
    };

    let days_left = (due - today).num_days();
    let score = if days_left <= 0 {
        1.0
    } else {
        (1.0 - days_left as f64 / URGENCY_WINDOW_DAYS as f64).clamp(0.0, 1.0)
    };

    Urgency {
        score,
        days_left: Some(days_left),
    }
}

/// Importance (1-10) scaled to [0.1, 1].
pub fn importance_norm(importance: u8) -> f64 {
    f64::from(importance) / 10.0
}

/// Inverse effort: 1 for zero hours, 0 at `MAX_EFFORT_HOURS` or more.
pub fn quick_win(estimated_hours: f64) -> f64 {
    let capped = estimated_hours.clamp(0.0, MAX_EFFORT_HOURS);
    1.0 - capped / MAX_EFFORT_HOURS
}

/// The three components that depend on a task alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalized {
    pub urgency: f64,
    pub days_left: Option<i64>,
    pub importance_norm: f64,
    pub quick_win: f64,
}

impl Normalized {
    /// Attach the batch-derived dependency score.
    pub fn with_dep_score(self, dep_score: f64) -> Components {
        Components {
            urgency: self.urgency,
            importance_norm: self.importance_norm,
            quick_win: self.quick_win,
            dep_score,
        }
    }
}

/// Normalise a single task.
pub fn normalize(task: &Task, today: NaiveDate) -> Normalized {
    let urgency = urgency(task.due_date, today);
    Normalized {
        urgency: urgency.score,
        days_left: urgency.days_left,
        importance_norm: importance_norm(task.importance),
        quick_win: quick_win(task.estimated_hours),
    }
}

/// All four inputs to a strategy, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Components {
    pub urgency: f64,
    pub importance_norm: f64,
    pub quick_win: f64,
    pub dep_score: f64,
}

impl Components {
    pub fn new(urgency: f64, importance_norm: f64, quick_win: f64, dep_score: f64) -> Self {
        Self {
            urgency,
            importance_norm,
            quick_win,
            dep_score,
        }
    }
}
