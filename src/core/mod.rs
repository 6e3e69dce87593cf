//! Core domain models for task analysis.
//!
//! This module contains the task records a batch is made of and the
//! dependency graph built over them.

pub mod dag;
pub mod task;

pub use dag::{DependencyAnalysis, DependencyGraph};
pub use task::{Task, TaskId, TaskInput};
