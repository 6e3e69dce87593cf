pub mod api;
pub mod config;
pub mod core;
pub mod error;
pub mod log;
pub mod scoring;
pub mod validation;

pub use api::{AnalyzeRequest, AnalyzeResponse, RequestContext, SuggestRequest, SuggestResponse};
pub use config::Config;
pub use core::{Task, TaskId, TaskInput};
pub use error::{Error, Result};
pub use scoring::{Analyzer, ScoredTask, Strategy, Summary};
pub use validation::{validate_tasks, ValidationError};
