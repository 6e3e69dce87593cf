//! Request and response bodies for the two operations, Analyze and Suggest.
//!
//! Both are pure functions of their request plus a `RequestContext` carrying
//! the calendar day, the response timestamp and the configured defaults.
//! Nothing is kept between calls.

use chrono::{DateTime, Days, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::core::TaskInput;
use crate::scoring::{Analyzer, ScoredTask, Strategy, StrategyInfo, Summary};
use crate::validation::{validate_tasks, ValidationError};
use crate::{alog, alog_debug, alog_warn, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub strategy: Option<String>,
    pub tasks: Vec<TaskInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub strategy: Strategy,
    pub generated_at: DateTime<Utc>,
    /// Scored tasks, highest score first.
    pub tasks: Vec<ScoredTask>,
    pub summary: Summary,
}

/// Every field is optional; an empty body asks for the sample batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuggestRequest {
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub tasks: Option<Vec<TaskInput>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestResponse {
    pub generated_at: DateTime<Utc>,
    pub strategy: Strategy,
    pub limit: usize,
    /// The top `limit` tasks.
    pub tasks: Vec<ScoredTask>,
    /// Summary of the whole batch, not just the returned tasks.
    pub summary: Summary,
    pub strategies: Vec<StrategyInfo>,
}

/// Per-call inputs that do not come from the request body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestContext {
    pub today: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub default_strategy: Strategy,
    pub suggest_limit: usize,
}

impl RequestContext {
    /// Context for a call made now, using the configured defaults.
    ///
    /// `today` is the local calendar day; the timestamp is UTC.
    pub fn now(config: &Config) -> Self {
        let now = Local::now();
        Self {
            today: now.date_naive(),
            generated_at: now.with_timezone(&Utc),
            default_strategy: config.default_strategy,
            suggest_limit: config.suggest_limit,
        }
    }

    /// Context pinned to a given day and timestamp with built-in defaults.
    pub fn at(today: NaiveDate, generated_at: DateTime<Utc>) -> Self {
        let config = Config::default();
        Self {
            today,
            generated_at,
            default_strategy: config.default_strategy,
            suggest_limit: config.suggest_limit,
        }
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    fn strategy(&self, requested: Option<&str>) -> std::result::Result<Strategy, ValidationError> {
        match requested {
            Some(name) => name.parse(),
            None => Ok(self.default_strategy),
        }
    }

    fn limit(&self, requested: Option<i64>) -> usize {
        match requested {
            Some(limit) if limit <= 0 => 1,
            Some(limit) => usize::try_from(limit).unwrap_or(usize::MAX),
            None => self.suggest_limit.max(1),
        }
    }
}

/// Validate, score and rank a batch.
pub fn analyze(request: &AnalyzeRequest, ctx: &RequestContext) -> Result<AnalyzeResponse> {
    let strategy = ctx.strategy(request.strategy.as_deref()).inspect_err(reject)?;
    let tasks = validate_tasks(&request.tasks).inspect_err(reject)?;
    alog_debug!(
        "analyze: {} tasks, strategy={}, today={}",
        tasks.len(),
        strategy,
        ctx.today
    );

    let ranked = Analyzer::new(strategy, ctx.today).rank(&tasks);
    let summary = Summary::of(strategy, &ranked);
    alog!(
        "analyze: ranked {} tasks, average score {}",
        summary.total_tasks,
        summary.average_score
    );

    Ok(AnalyzeResponse {
        strategy,
        generated_at: ctx.generated_at,
        tasks: ranked,
        summary,
    })
}

/// Top-priority tasks of a batch (or of the sample batch) plus the metadata
/// a client needs to offer strategy selection.
pub fn suggest(request: &SuggestRequest, ctx: &RequestContext) -> Result<SuggestResponse> {
    let strategy = ctx.strategy(request.strategy.as_deref()).inspect_err(reject)?;
    let limit = ctx.limit(request.limit);

    let inputs = match &request.tasks {
        Some(tasks) => tasks.clone(),
        None => {
            alog_debug!("suggest: no tasks supplied, using sample batch");
            sample_tasks(ctx.today)
        }
    };
    let tasks = validate_tasks(&inputs).inspect_err(reject)?;

    let mut ranked = Analyzer::new(strategy, ctx.today).rank(&tasks);
    let summary = Summary::of(strategy, &ranked);
    ranked.truncate(limit);
    alog!(
        "suggest: returning {} of {} tasks, strategy={}",
        ranked.len(),
        summary.total_tasks,
        strategy
    );

    Ok(SuggestResponse {
        generated_at: ctx.generated_at,
        strategy,
        limit,
        tasks: ranked,
        summary,
        strategies: Strategy::ALL.iter().map(Strategy::info).collect(),
    })
}

/// Decode an Analyze body and run it.
pub fn analyze_json(body: &str, ctx: &RequestContext) -> Result<AnalyzeResponse> {
    let request: AnalyzeRequest = serde_json::from_str(body)?;
    analyze(&request, ctx)
}

/// Decode a Suggest body and run it. A blank body is an empty request.
pub fn suggest_json(body: &str, ctx: &RequestContext) -> Result<SuggestResponse> {
    let request: SuggestRequest = if body.trim().is_empty() {
        SuggestRequest::default()
    } else {
        serde_json::from_str(body)?
    };
    suggest(&request, ctx)
}

/// Example batch dated relative to `today`.
pub fn sample_tasks(today: NaiveDate) -> Vec<TaskInput> {
    let due_in = |days: u64| {
        today
            .checked_add_days(Days::new(days))
            .map(|date| date.to_string())
    };
    let sample = |id: i64, title: &str, due: Option<String>, hours: f64, importance: i64, deps: &[i64]| {
        TaskInput {
            id: Some(id),
            title: Some(title.to_string()),
            due_date: due,
            estimated_hours: Some(hours),
            importance: Some(importance),
            dependencies: Some(deps.to_vec()),
        }
    };

    vec![
        sample(1, "Fix login bug", due_in(1), 1.5, 9, &[]),
        sample(2, "Write release notes", due_in(5), 1.0, 6, &[1]),
        sample(3, "Refactor billing module", due_in(14), 8.0, 7, &[]),
        sample(4, "Update onboarding docs", None, 2.0, 4, &[]),
        sample(5, "Prepare quarterly review", due_in(3), 4.0, 8, &[3]),
    ]
}

fn reject(err: &ValidationError) {
    alog_warn!("Rejected batch: {}", err);
}
