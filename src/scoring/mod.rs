//! Strategy-weighted scoring of a validated batch.
//!
//! The pipeline runs three stages with no shared state between calls:
//! 1. `normalize` turns each task into [0, 1] components
//! 2. `DependencyAnalysis` derives unblocking scores and cycle membership
//! 3. the selected `Strategy` combines them into a 0-100 score, tasks on a
//!    dependency cycle are penalised, and an explanation is attached
//!
//! Ranking sorts by descending score and keeps input order among ties.

pub mod explain;
pub mod normalize;
pub mod strategy;

pub use normalize::{normalize, Components, Normalized};
pub use strategy::{Strategy, StrategyInfo, Weights};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::alog_trace;
use crate::core::{DependencyAnalysis, Task};
use explain::Signals;

/// Multiplier applied to the base score of tasks on a dependency cycle.
pub const CYCLE_PENALTY: f64 = 0.2;

/// How many titles the summary lists.
const SUMMARY_TOP_TITLES: usize = 3;

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Final 0-100 score for one task's components.
pub fn final_score(strategy: Strategy, components: &Components, cycle_issue: bool) -> f64 {
    let mut base = strategy.base_score(components);
    if cycle_issue {
        base *= CYCLE_PENALTY;
    }
    round_to(base.clamp(0.0, 1.0) * 100.0, 2)
}

/// Component values reported alongside a score.
///
/// The four scores are rounded to 4 places for display only; scoring uses
/// the unrounded values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentBreakdown {
    pub urgency: f64,
    pub importance_norm: f64,
    pub quick_win: f64,
    pub dep_score: f64,
    pub num_dependents: usize,
    pub days_left: Option<i64>,
}

impl ComponentBreakdown {
    fn new(components: &Components, num_dependents: usize, days_left: Option<i64>) -> Self {
        Self {
            urgency: round_to(components.urgency, 4),
            importance_norm: round_to(components.importance_norm, 4),
            quick_win: round_to(components.quick_win, 4),
            dep_score: round_to(components.dep_score, 4),
            num_dependents,
            days_left,
        }
    }
}

/// A task with its score, explanation and cycle flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTask {
    #[serde(flatten)]
    pub task: Task,
    /// Score in [0, 100], two decimals.
    pub score: f64,
    pub explanation: String,
    pub cycle_issue: bool,
    /// 1-based position after ranking.
    pub rank: usize,
    pub components: ComponentBreakdown,
}

/// Aggregate view of a ranked batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub strategy: Strategy,
    pub total_tasks: usize,
    pub average_score: f64,
    pub top_titles: Vec<String>,
}

impl Summary {
    /// Summarise tasks that are already in rank order.
    pub fn of(strategy: Strategy, ranked: &[ScoredTask]) -> Self {
        let average_score = if ranked.is_empty() {
            0.0
        } else {
            round_to(
                ranked.iter().map(|t| t.score).sum::<f64>() / ranked.len() as f64,
                2,
            )
        };
        Self {
            strategy,
            total_tasks: ranked.len(),
            average_score,
            top_titles: ranked
                .iter()
                .take(SUMMARY_TOP_TITLES)
                .map(|t| t.task.title.clone())
                .collect(),
        }
    }
}

/// Scores batches with one strategy as of one calendar day.
#[derive(Debug, Clone, Copy)]
pub struct Analyzer {
    strategy: Strategy,
    today: NaiveDate,
}

impl Analyzer {
    pub fn new(strategy: Strategy, today: NaiveDate) -> Self {
        Self { strategy, today }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Score one task against an analysis of its batch. `rank` is left at 0.
    pub fn score_task(&self, task: &Task, deps: &DependencyAnalysis) -> ScoredTask {
        let normalized = normalize(task, self.today);
        let components = normalized.with_dep_score(deps.dep_score(&task.id));
        let num_dependents = deps.dependents(&task.id);
        let cycle_issue = deps.in_cycle(&task.id);

        let score = final_score(self.strategy, &components, cycle_issue);
        let explanation = explain::explain(&Signals {
            task,
            components: &components,
            days_left: normalized.days_left,
            num_dependents,
            cycle_issue,
        });

        alog_trace!(
            "Scored task {} ({:?}): {} [{:?}] cycle={}",
            task.id,
            task.title,
            score,
            components,
            cycle_issue
        );

        ScoredTask {
            task: task.clone(),
            score,
            explanation,
            cycle_issue,
            rank: 0,
            components: ComponentBreakdown::new(&components, num_dependents, normalized.days_left),
        }
    }

    /// Score and rank a validated batch.
    pub fn rank(&self, tasks: &[Task]) -> Vec<ScoredTask> {
        let deps = DependencyAnalysis::of(tasks);
        let mut scored: Vec<ScoredTask> = tasks.iter().map(|t| self.score_task(t, &deps)).collect();

        // Stable: equal scores keep input order.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        for (index, task) in scored.iter_mut().enumerate() {
            task.rank = index + 1;
        }
        scored
    }
}
