//! Core data types for the scoring system.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Task identifier, as used by the host application's storage.
pub type TaskId = i64;

/// Wire format of due dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A task as supplied by the caller.
///
/// Scalar fields stay as raw JSON values: coercion and range checks belong to
/// the calculator so that every task in a batch can be checked and all
/// failures reported together. `null` and absent fields both read as `None`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskInput {
    #[serde(default)]
    pub id: Option<TaskId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub due_date: Option<Value>,
    #[serde(default)]
    pub estimated_hours: Option<Value>,
    #[serde(default)]
    pub importance: Option<Value>,
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
}

impl TaskInput {
    /// Build a fully-populated task.
    pub fn new(
        id: TaskId,
        title: impl Into<String>,
        due_date: NaiveDate,
        estimated_hours: f64,
        importance: i64,
    ) -> Self {
        Self {
            id: Some(id),
            title: Some(title.into()),
            due_date: Some(Value::String(due_date.format(DATE_FORMAT).to_string())),
            estimated_hours: Some(Value::from(estimated_hours)),
            importance: Some(Value::from(importance)),
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependencies(mut self, dependencies: Vec<TaskId>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Task id for messages, `unknown` when absent.
    pub fn display_id(&self) -> String {
        self.id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Task title for messages, `unknown` when absent.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("unknown")
    }
}

/// Weighted and raw sub-scores, rounded to two decimals.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub urgency_score: f64,
    pub importance_score: f64,
    pub effort_score: f64,
    pub dependency_score: f64,
    pub urgency_raw: f64,
    pub importance_raw: f64,
    pub effort_raw: f64,
    pub dependency_raw: f64,
}

/// Due-date facts relative to the reference date of the call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreMetadata {
    pub is_overdue: bool,
    pub days_overdue: i64,
    /// Negative when overdue.
    pub days_until_due: i64,
}

/// Result of scoring a single task.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriorityScore {
    pub priority_score: f64,
    pub score_breakdown: ScoreBreakdown,
    pub metadata: ScoreMetadata,
}

/// A task together with its score, serialized as one flat object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredTask {
    #[serde(flatten)]
    pub task: TaskInput,
    #[serde(flatten)]
    pub score: PriorityScore,
}

impl ScoredTask {
    pub fn priority_score(&self) -> f64 {
        self.score.priority_score
    }
}

/// Summary of a suggested task.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuggestedTask {
    pub id: Option<TaskId>,
    pub title: Option<String>,
    pub due_date: Option<Value>,
    pub priority_score: f64,
    pub is_overdue: bool,
    pub days_overdue: i64,
}

/// One entry of the "what should I work on next" list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub task: SuggestedTask,
    pub reason: String,
}

/// How the configured weights trade urgency against importance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BalanceType {
    UrgencyFocused,
    ImportanceFocused,
    Balanced,
}

/// Display-only description of the weight balance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BalanceExplanation {
    pub balance_type: BalanceType,
    pub description: String,
    pub weights: crate::config::Weights,
    pub note: String,
}
