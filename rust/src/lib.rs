//! Rust implementation of task priority scoring and dependency validation.
//!
//! The calculator combines urgency, importance, effort and dependency fan-out
//! into one weighted score per task. The dependency module checks that a batch
//! forms a valid acyclic graph. Python bindings are available behind the
//! `python` feature.

pub mod calculator;
pub mod calendar;
pub mod clock;
pub mod config;
pub mod dependency;
pub mod feedback;
pub mod graph;
pub mod logging;
pub mod matrix;
pub mod models;
pub mod scoring;
pub mod sorting;

#[cfg(feature = "python")]
mod python;

pub use calculator::{PriorityCalculator, ScoringError, TaskFailure, DEFAULT_SUGGESTION_COUNT};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Factor, Weights, WeightsError};
pub use dependency::{
    count_dependents, detect_circular_dependencies, validate_dependencies, validate_graph,
    DependencyError, DependencyNode,
};
pub use feedback::{adjusted_weights, FeedbackEntry, FeedbackStats};
pub use graph::{dependency_graph, GraphData, GraphEdge, GraphNode};
pub use matrix::{CategorizedTask, EisenhowerMatrix, Quadrant};
pub use models::{
    BalanceExplanation, BalanceType, PriorityScore, ScoreBreakdown, ScoreMetadata, ScoredTask,
    SuggestedTask, Suggestion, TaskId, TaskInput,
};
pub use sorting::sort_by_priority;
