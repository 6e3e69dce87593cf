//! Human-readable explanations of a task's score.
//!
//! Phrases are assembled in a fixed order (urgency, importance, effort,
//! unblocking, cycle) and joined with "; ". Thresholds are compared against
//! components rounded to 4 places, the same values reported in the output.

use super::normalize::Components;
use super::round_to;
use crate::core::Task;

/// Urgency at or above which a dated task reads as "Very urgent".
pub const VERY_URGENT: f64 = 0.8;
/// Urgency at or above which a dated task reads as "Moderately urgent".
pub const MODERATELY_URGENT: f64 = 0.5;
/// Quick-win score at or above which a task reads as a quick win.
pub const QUICK_WIN: f64 = 0.7;
/// Quick-win score at or below which a task reads as higher effort.
pub const HIGHER_EFFORT: f64 = 0.3;

/// Everything an explanation is built from.
#[derive(Debug, Clone, Copy)]
pub struct Signals<'a> {
    pub task: &'a Task,
    pub components: &'a Components,
    pub days_left: Option<i64>,
    pub num_dependents: usize,
    pub cycle_issue: bool,
}

pub fn explain(signals: &Signals<'_>) -> String {
    let task = signals.task;
    let mut parts = vec![urgency_phrase(signals.components.urgency, signals.days_left)];

    parts.push(format!("Importance {}/10", task.importance));
    parts.push(effort_phrase(signals.components.quick_win, task.estimated_hours));

    if signals.num_dependents > 0 {
        parts.push(format!("Blocks {} other task(s)", signals.num_dependents));
    }
    if signals.cycle_issue {
        parts.push("Part of dependency cycle".to_string());
    }

    parts.join("; ")
}

fn urgency_phrase(urgency: f64, days_left: Option<i64>) -> String {
    let Some(days) = days_left else {
        return "No due date".to_string();
    };
    if days < 0 {
        return format!("Overdue by {} day(s)", -days);
    }

    let urgency = round_to(urgency, 4);
    let grade = if urgency >= VERY_URGENT {
        "Very urgent"
    } else if urgency >= MODERATELY_URGENT {
        "Moderately urgent"
    } else {
        "Low urgency"
    };
    if days == 0 {
        format!("{} (due today)", grade)
    } else {
        format!("{} (due in {} day(s))", grade, days)
    }
}

fn effort_phrase(quick_win: f64, hours: f64) -> String {
    let quick_win = round_to(quick_win, 4);
    if quick_win >= QUICK_WIN {
        format!("Quick win ({}h)", hours)
    } else if quick_win <= HIGHER_EFFORT {
        format!("Higher effort ({}h)", hours)
    } else {
        format!("Moderate effort ({}h)", hours)
    }
}
