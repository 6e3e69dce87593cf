//! Scoring strategies.
//!
//! A strategy is a closed set of fixed weightings over the four normalised
//! components. Each weighting sums to 1.0, so a strategy maps components in
//! [0, 1] to a base score in [0, 1].

use serde::{Deserialize, Serialize};

use super::normalize::Components;
use crate::validation::ValidationError;

/// Named weighting of the score components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Even mix of urgency and importance with some effort and unblocking.
    #[default]
    SmartBalance,
    /// Cheap tasks first.
    FastestWins,
    /// Most important tasks first.
    HighImpact,
    /// Nearest deadlines first.
    DeadlineDriven,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::SmartBalance,
        Strategy::FastestWins,
        Strategy::HighImpact,
        Strategy::DeadlineDriven,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::SmartBalance => "smart_balance",
            Strategy::FastestWins => "fastest_wins",
            Strategy::HighImpact => "high_impact",
            Strategy::DeadlineDriven => "deadline_driven",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Strategy::SmartBalance => {
                "Balances urgency and importance, with a nudge for quick wins and tasks that unblock others"
            }
            Strategy::FastestWins => "Prefers low-effort tasks that can be finished quickly",
            Strategy::HighImpact => "Prefers the most important tasks regardless of effort",
            Strategy::DeadlineDriven => "Prefers tasks with the nearest due dates",
        }
    }

    pub fn weights(&self) -> Weights {
        match self {
            Strategy::SmartBalance => Weights::new(0.35, 0.35, 0.15, 0.15),
            Strategy::FastestWins => Weights::new(0.20, 0.20, 0.60, 0.0),
            Strategy::HighImpact => Weights::new(0.20, 0.70, 0.0, 0.10),
            Strategy::DeadlineDriven => Weights::new(0.70, 0.20, 0.10, 0.0),
        }
    }

    /// Base score in [0, 1] before any cycle penalty.
    pub fn base_score(&self, components: &Components) -> f64 {
        self.weights().apply(components)
    }

    /// Name, description and weights, for callers building a strategy picker.
    pub fn info(&self) -> StrategyInfo {
        StrategyInfo {
            name: *self,
            description: self.description().to_string(),
            weights: self.weights(),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Strategy {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let name = s.trim();
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == name)
            .ok_or_else(|| ValidationError::UnknownStrategy(name.to_string()))
    }
}

/// Weight per component. Weights are non-negative and sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub urgency: f64,
    pub importance: f64,
    pub quick_win: f64,
    pub dependency: f64,
}

impl Weights {
    pub const fn new(urgency: f64, importance: f64, quick_win: f64, dependency: f64) -> Self {
        Self {
            urgency,
            importance,
            quick_win,
            dependency,
        }
    }

    pub fn total(&self) -> f64 {
        self.urgency + self.importance + self.quick_win + self.dependency
    }

    /// Linear combination of the components.
    pub fn apply(&self, c: &Components) -> f64 {
        self.urgency * c.urgency
            + self.importance * c.importance_norm
            + self.quick_win * c.quick_win
            + self.dependency * c.dep_score
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyInfo {
    pub name: Strategy,
    pub description: String,
    pub weights: Weights,
}
