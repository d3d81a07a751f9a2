//! Priority calculator: validates task fields, combines the four sub-scores
//! into one weighted priority score and explains the result.
//!
//! The default weights favour urgency (40%) over importance (30%), with effort
//! and dependency fan-out at 15% each. Overdue tasks receive a super-linear
//! urgency boost whatever the weights are.

use chrono::NaiveDate;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::clock::{Clock, SystemClock};
use crate::config::{Weights, WeightsError};
use crate::dependency::{count_dependents, validate_graph, DependencyError};
use crate::models::{
    BalanceExplanation, BalanceType, PriorityScore, ScoreBreakdown, ScoreMetadata, ScoredTask,
    SuggestedTask, Suggestion, TaskInput, DATE_FORMAT,
};
use crate::scoring::{dependency_score, effort_score, importance_score, round2, urgency_score};
use crate::sorting::sort_by_priority;
use crate::{log_changes, log_checks, log_debug};

/// Number of tasks returned by [`PriorityCalculator::suggest_tasks`] by default.
pub const DEFAULT_SUGGESTION_COUNT: usize = 3;

/// Importance assumed by explanations when the rating cannot be read.
const FALLBACK_IMPORTANCE: i64 = 5;

/// Effort assumed by explanations when the estimate cannot be read.
const FALLBACK_HOURS: f64 = 4.0;

const BALANCE_NOTE: &str =
    "Overdue tasks still receive exponential urgency boost regardless of weights";

/// Fields every task must carry before a batch is analyzed.
const REQUIRED_FIELDS: [&str; 5] = ["id", "title", "due_date", "estimated_hours", "importance"];

/// One task that could not be scored within a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskFailure {
    pub task_id: String,
    pub task_title: String,
    pub error: String,
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Task {} ({}): {}", self.task_id, self.task_title, self.error)
    }
}

fn format_failures(failures: &[TaskFailure]) -> String {
    failures
        .iter()
        .map(|failure| failure.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Errors that can occur while scoring tasks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error(transparent)]
    Weights(#[from] WeightsError),
    #[error(transparent)]
    Dependency(#[from] DependencyError),
    #[error("Task missing required field: '{0}'")]
    MissingField(&'static str),
    #[error("Invalid due_date format: {0}. Expected YYYY-MM-DD format")]
    InvalidDueDate(String),
    #[error("Invalid importance value: {0}. Must be integer between 1-10")]
    InvalidImportance(String),
    #[error("Invalid estimated_hours value: {0}. Must be positive number")]
    InvalidEstimatedHours(String),
    #[error("Tasks list cannot be empty")]
    EmptyTaskList,
    #[error("Task {task_id} missing required fields: {}", .fields.join(", "))]
    MissingFields {
        task_id: String,
        fields: Vec<&'static str>,
    },
    #[error("Failed to analyze {} task(s):\n{}", .0.len(), format_failures(.0))]
    BatchFailed(Vec<TaskFailure>),
}

/// Render a raw field value the way a user typed it.
fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse a due date given as a `YYYY-MM-DD` string.
pub fn parse_due_date(value: Option<&Value>) -> Result<NaiveDate, ScoringError> {
    let value = value.ok_or(ScoringError::MissingField("due_date"))?;
    match value {
        Value::String(s) => NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map_err(|_| ScoringError::InvalidDueDate(s.clone())),
        other => Err(ScoringError::InvalidDueDate(describe(other))),
    }
}

/// Coerce an importance rating to an integer without checking its range.
///
/// Accepts integers, floats (truncated) and integer strings.
pub fn coerce_importance(value: &Value) -> Result<i64, ScoringError> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ScoringError::InvalidImportance(describe(value)))
}

/// Coerce an importance rating to an integer in 1..=10.
pub fn parse_importance(value: Option<&Value>) -> Result<i64, ScoringError> {
    let value = value.ok_or(ScoringError::MissingField("importance"))?;
    match coerce_importance(value)? {
        importance if (1..=10).contains(&importance) => Ok(importance),
        _ => Err(ScoringError::InvalidImportance(describe(value))),
    }
}

/// Coerce an effort estimate to a positive number of hours.
pub fn parse_estimated_hours(value: Option<&Value>) -> Result<f64, ScoringError> {
    let value = value.ok_or(ScoringError::MissingField("estimated_hours"))?;
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(hours) if hours.is_finite() && hours > 0.0 => Ok(hours),
        _ => Err(ScoringError::InvalidEstimatedHours(describe(value))),
    }
}

fn missing_fields(task: &TaskInput) -> Vec<&'static str> {
    let present = [
        task.id.is_some(),
        task.title.is_some(),
        task.due_date.is_some(),
        task.estimated_hours.is_some(),
        task.importance.is_some(),
    ];
    REQUIRED_FIELDS
        .into_iter()
        .zip(present)
        .filter(|(_, present)| !present)
        .map(|(field, _)| field)
        .collect()
}

/// Scores tasks with a fixed set of weights.
///
/// The calculator holds no per-call state: the weights are validated at
/// construction and the reference date is read from the clock once per call.
#[derive(Clone, Debug)]
pub struct PriorityCalculator<C = SystemClock> {
    weights: Weights,
    clock: C,
    verbosity: u8,
}

impl PriorityCalculator<SystemClock> {
    /// Create a calculator, merging optional overrides over the default weights.
    pub fn new(overrides: Option<&HashMap<String, f64>>) -> Result<Self, WeightsError> {
        let weights = match overrides {
            Some(overrides) => Weights::from_overrides(overrides)?,
            None => Weights::default(),
        };
        Self::from_weights(weights)
    }

    /// Create a calculator from a complete weight set.
    pub fn from_weights(weights: Weights) -> Result<Self, WeightsError> {
        Ok(Self {
            weights: weights.validated()?,
            clock: SystemClock,
            verbosity: 0,
        })
    }
}

impl Default for PriorityCalculator<SystemClock> {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            clock: SystemClock,
            verbosity: 0,
        }
    }
}

impl<C: Clock> PriorityCalculator<C> {
    /// Replace the source of "today".
    pub fn with_clock<K: Clock>(self, clock: K) -> PriorityCalculator<K> {
        PriorityCalculator {
            weights: self.weights,
            clock,
            verbosity: self.verbosity,
        }
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn verbosity(&self) -> u8 {
        self.verbosity
    }

    /// Reference date as seen by this calculator right now.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Score one task given how many tasks depend on it.
    pub fn calculate_priority_score(
        &self,
        task: &TaskInput,
        dependent_count: usize,
    ) -> Result<PriorityScore, ScoringError> {
        self.score_at(task, dependent_count, self.clock.today())
    }

    fn score_at(
        &self,
        task: &TaskInput,
        dependent_count: usize,
        today: NaiveDate,
    ) -> Result<PriorityScore, ScoringError> {
        let due_date = parse_due_date(task.due_date.as_ref())?;
        let importance = parse_importance(task.importance.as_ref())?;
        let estimated_hours = parse_estimated_hours(task.estimated_hours.as_ref())?;

        let days_until_due = (due_date - today).num_days();
        let is_overdue = days_until_due < 0;

        let urgency = urgency_score(due_date, today);
        let importance = importance_score(importance);
        let effort = effort_score(estimated_hours);
        let dependency = dependency_score(dependent_count);
        log_debug!(
            self.verbosity,
            "task {}: raw urgency={:.2} importance={:.2} effort={:.2} dependency={:.2}",
            task.display_id(),
            urgency,
            importance,
            effort,
            dependency
        );

        let weighted_urgency = urgency * self.weights.urgency;
        let weighted_importance = importance * self.weights.importance;
        let weighted_effort = effort * self.weights.effort;
        let weighted_dependency = dependency * self.weights.dependencies;
        let total = weighted_urgency + weighted_importance + weighted_effort + weighted_dependency;

        Ok(PriorityScore {
            priority_score: round2(total),
            score_breakdown: ScoreBreakdown {
                urgency_score: round2(weighted_urgency),
                importance_score: round2(weighted_importance),
                effort_score: round2(weighted_effort),
                dependency_score: round2(weighted_dependency),
                urgency_raw: round2(urgency),
                importance_raw: round2(importance),
                effort_raw: round2(effort),
                dependency_raw: round2(dependency),
            },
            metadata: ScoreMetadata {
                is_overdue,
                days_overdue: if is_overdue { -days_until_due } else { 0 },
                days_until_due,
            },
        })
    }

    /// Score a batch and return it sorted by priority, highest first.
    ///
    /// Fails fast on an empty batch or a task missing a required field. Past
    /// that point every task is scored and all failures are reported together.
    pub fn analyze_tasks(&self, tasks: &[TaskInput]) -> Result<Vec<ScoredTask>, ScoringError> {
        if tasks.is_empty() {
            return Err(ScoringError::EmptyTaskList);
        }
        for task in tasks {
            let fields = missing_fields(task);
            if !fields.is_empty() {
                return Err(ScoringError::MissingFields {
                    task_id: task.display_id(),
                    fields,
                });
            }
        }

        let today = self.clock.today();
        let dependent_counts = count_dependents(tasks);

        let mut scored: Vec<ScoredTask> = Vec::with_capacity(tasks.len());
        let mut failures: Vec<TaskFailure> = Vec::new();
        for task in tasks {
            let dependent_count = task
                .id
                .and_then(|id| dependent_counts.get(&id).copied())
                .unwrap_or(0);
            match self.score_at(task, dependent_count, today) {
                Ok(score) => {
                    log_checks!(
                        self.verbosity,
                        "task {} scored {:.2} ({} dependents)",
                        task.display_id(),
                        score.priority_score,
                        dependent_count
                    );
                    scored.push(ScoredTask {
                        task: task.clone(),
                        score,
                    });
                }
                Err(err) => failures.push(TaskFailure {
                    task_id: task.display_id(),
                    task_title: task.display_title().to_string(),
                    error: err.to_string(),
                }),
            }
        }

        if !failures.is_empty() {
            log_changes!(
                self.verbosity,
                "{} of {} tasks failed validation",
                failures.len(),
                tasks.len()
            );
            return Err(ScoringError::BatchFailed(failures));
        }

        sort_by_priority(&mut scored);
        log_changes!(
            self.verbosity,
            "analyzed {} tasks as of {}",
            scored.len(),
            today
        );
        Ok(scored)
    }

    /// Validate the dependency graph, score the batch and explain the top
    /// `limit` tasks.
    pub fn suggest_tasks(
        &self,
        tasks: &[TaskInput],
        limit: usize,
    ) -> Result<Vec<Suggestion>, ScoringError> {
        validate_graph(tasks)?;
        let scored = self.analyze_tasks(tasks)?;

        Ok(scored
            .into_iter()
            .take(limit)
            .map(|scored| Suggestion {
                reason: self.generate_task_explanation(&scored),
                task: SuggestedTask {
                    id: scored.task.id,
                    title: scored.task.title,
                    due_date: scored.task.due_date,
                    priority_score: scored.score.priority_score,
                    is_overdue: scored.score.metadata.is_overdue,
                    days_overdue: scored.score.metadata.days_overdue,
                },
            })
            .collect())
    }

    /// One-sentence reason why a scored task ranks where it does.
    pub fn generate_task_explanation(&self, task: &ScoredTask) -> String {
        let mut clauses: Vec<String> = Vec::new();

        let days_until_due = task.score.metadata.days_until_due;
        if days_until_due < 0 {
            let days_overdue = -days_until_due;
            clauses.push(match days_overdue {
                1 => "overdue by 1 day (CRITICAL)".to_string(),
                2..=7 => format!("overdue by {} days (URGENT)", days_overdue),
                _ => format!(
                    "overdue by {} days (CRITICAL - requires immediate attention)",
                    days_overdue
                ),
            });
        } else if days_until_due == 0 {
            clauses.push("due TODAY (URGENT)".to_string());
        } else if days_until_due <= 3 {
            clauses.push(format!("due in {} day(s) (URGENT)", days_until_due));
        }

        let importance =
            parse_importance(task.task.importance.as_ref()).unwrap_or(FALLBACK_IMPORTANCE);
        if importance >= 8 {
            clauses.push(format!("high importance ({}/10)", importance));
        } else if importance >= 6 {
            clauses.push(format!("medium importance ({}/10)", importance));
        }

        let hours =
            parse_estimated_hours(task.task.estimated_hours.as_ref()).unwrap_or(FALLBACK_HOURS);
        if hours <= 2.0 {
            clauses.push(format!("quick win ({:?}h)", hours));
        }

        let dependency_raw = task.score.score_breakdown.dependency_raw;
        if dependency_raw >= 50.0 {
            clauses.push("blocks multiple tasks".to_string());
        } else if dependency_raw > 0.0 {
            clauses.push("blocks other task(s)".to_string());
        }

        if clauses.is_empty() {
            clauses.push(format!(
                "balanced priority (score: {:.1})",
                task.score.priority_score
            ));
        }

        format!("This task is {}.", clauses.join(", "))
    }

    /// Describe whether urgency or importance dominates the configured weights.
    pub fn balance_explanation(&self) -> BalanceExplanation {
        let urgency = self.weights.urgency;
        let importance = self.weights.importance;
        let (urgency_pct, importance_pct) = (urgency * 100.0, importance * 100.0);

        let (balance_type, description) = if urgency > importance {
            (
                BalanceType::UrgencyFocused,
                format!(
                    "Urgency ({:.0}%) is weighted higher than importance ({:.0}%), so urgent tasks will generally rank higher.",
                    urgency_pct, importance_pct
                ),
            )
        } else if importance > urgency {
            (
                BalanceType::ImportanceFocused,
                format!(
                    "Importance ({:.0}%) is weighted higher than urgency ({:.0}%), so important tasks will generally rank higher.",
                    importance_pct, urgency_pct
                ),
            )
        } else {
            (
                BalanceType::Balanced,
                format!(
                    "Urgency and importance are equally weighted ({:.0}% each), providing balanced prioritization.",
                    urgency_pct
                ),
            )
        };

        BalanceExplanation {
            balance_type,
            description,
            weights: self.weights,
            note: BALANCE_NOTE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::Days;
    use serde_json::json;

    // Monday, no holidays nearby
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
    }

    fn calc() -> PriorityCalculator<FixedClock> {
        PriorityCalculator::default().with_clock(FixedClock::new(today()))
    }

    fn due_in(days: i64) -> NaiveDate {
        if days >= 0 {
            today().checked_add_days(Days::new(days as u64)).unwrap()
        } else {
            today().checked_sub_days(Days::new((-days) as u64)).unwrap()
        }
    }

    fn make_task(id: i64, due_offset: i64, hours: f64, importance: i64) -> TaskInput {
        TaskInput::new(id, format!("Task {}", id), due_in(due_offset), hours, importance)
    }

    fn weights_map(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_priority_score_due_today() {
        // urgency 100 * .4 + importance 80 * .3 + effort 60 * .15 + 0
        let score = calc()
            .calculate_priority_score(&make_task(1, 0, 3.0, 8), 0)
            .unwrap();
        assert!((score.priority_score - 73.0).abs() < 1e-9);
        assert_eq!(score.score_breakdown.urgency_raw, 100.0);
        assert!((score.score_breakdown.urgency_score - 40.0).abs() < 1e-9);
        assert!((score.score_breakdown.importance_score - 24.0).abs() < 1e-9);
        assert!((score.score_breakdown.effort_score - 9.0).abs() < 1e-9);
        assert_eq!(score.score_breakdown.dependency_score, 0.0);
        assert_eq!(
            score.metadata,
            ScoreMetadata {
                is_overdue: false,
                days_overdue: 0,
                days_until_due: 0,
            }
        );
    }

    #[test]
    fn test_overdue_metadata() {
        let score = calc()
            .calculate_priority_score(&make_task(1, -3, 3.0, 5), 0)
            .unwrap();
        assert!(score.metadata.is_overdue);
        assert_eq!(score.metadata.days_overdue, 3);
        assert_eq!(score.metadata.days_until_due, -3);
        assert!(score.score_breakdown.urgency_raw > 80.0);
    }

    #[test]
    fn test_dependents_raise_score() {
        let task = make_task(1, 5, 4.0, 5);
        let with_dependents = calc().calculate_priority_score(&task, 3).unwrap();
        let without = calc().calculate_priority_score(&task, 0).unwrap();
        assert!(with_dependents.priority_score > without.priority_score);
        assert_eq!(with_dependents.score_breakdown.dependency_raw, 65.0);
    }

    #[test]
    fn test_missing_field_errors() {
        let mut task = make_task(1, 2, 3.0, 5);
        task.due_date = None;
        assert_eq!(
            calc().calculate_priority_score(&task, 0),
            Err(ScoringError::MissingField("due_date"))
        );

        let mut task = make_task(1, 2, 3.0, 5);
        task.importance = None;
        assert_eq!(
            calc().calculate_priority_score(&task, 0),
            Err(ScoringError::MissingField("importance"))
        );

        let mut task = make_task(1, 2, 3.0, 5);
        task.estimated_hours = None;
        let err = calc().calculate_priority_score(&task, 0).unwrap_err();
        assert_eq!(err.to_string(), "Task missing required field: 'estimated_hours'");
    }

    #[test]
    fn test_due_date_shapes() {
        assert_eq!(
            parse_due_date(Some(&json!("2025-03-10"))),
            Ok(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap())
        );
        assert!(matches!(
            parse_due_date(Some(&json!("10/03/2025"))),
            Err(ScoringError::InvalidDueDate(s)) if s == "10/03/2025"
        ));
        assert!(matches!(
            parse_due_date(Some(&json!(20250310))),
            Err(ScoringError::InvalidDueDate(_))
        ));
    }

    #[test]
    fn test_importance_coercion() {
        assert_eq!(parse_importance(Some(&json!(7))), Ok(7));
        assert_eq!(parse_importance(Some(&json!("7"))), Ok(7));
        assert_eq!(parse_importance(Some(&json!(7.9))), Ok(7));
        assert!(matches!(
            parse_importance(Some(&json!(11))),
            Err(ScoringError::InvalidImportance(_))
        ));
        assert!(matches!(
            parse_importance(Some(&json!(0))),
            Err(ScoringError::InvalidImportance(_))
        ));
        assert!(matches!(
            parse_importance(Some(&json!("high"))),
            Err(ScoringError::InvalidImportance(s)) if s == "high"
        ));
    }

    #[test]
    fn test_hours_coercion() {
        assert_eq!(parse_estimated_hours(Some(&json!(2))), Ok(2.0));
        assert_eq!(parse_estimated_hours(Some(&json!("1.5"))), Ok(1.5));
        assert!(parse_estimated_hours(Some(&json!(0))).is_err());
        assert!(parse_estimated_hours(Some(&json!(-3.0))).is_err());
        assert!(parse_estimated_hours(Some(&json!([1]))).is_err());
    }

    #[test]
    fn test_custom_weights() {
        let importance_first = PriorityCalculator::new(Some(&weights_map(&[
            ("urgency", 0.2),
            ("importance", 0.5),
        ])))
        .unwrap()
        .with_clock(FixedClock::new(today()));

        // Far-off but vital vs. due soon but trivial
        let vital = make_task(1, 60, 4.0, 10);
        let trivial = make_task(2, 1, 4.0, 2);

        let scored = importance_first.analyze_tasks(&[trivial.clone(), vital.clone()]).unwrap();
        assert_eq!(scored[0].task.id, Some(1));

        let scored = calc().analyze_tasks(&[vital, trivial]).unwrap();
        assert_eq!(scored[0].task.id, Some(2));
    }

    #[test]
    fn test_invalid_weights_fail_construction() {
        let doubled = weights_map(&[
            ("urgency", 0.8),
            ("importance", 0.6),
            ("effort", 0.3),
            ("dependencies", 0.3),
        ]);
        assert!(matches!(
            PriorityCalculator::new(Some(&doubled)),
            Err(WeightsError::BadSum { .. })
        ));

        let negative = weights_map(&[("urgency", 0.6), ("effort", -0.05)]);
        assert!(matches!(
            PriorityCalculator::new(Some(&negative)),
            Err(WeightsError::Negative { .. })
        ));

        let unknown = weights_map(&[("fun", 0.1)]);
        assert!(matches!(
            PriorityCalculator::new(Some(&unknown)),
            Err(WeightsError::UnknownKeys(_))
        ));
    }

    #[test]
    fn test_analyze_sorts_descending_and_bounds() {
        let tasks = vec![
            make_task(1, 40, 20.0, 2),
            make_task(2, -5, 1.0, 9),
            make_task(3, 7, 6.0, 6).with_dependencies(vec![2]),
            make_task(4, 0, 0.5, 10).with_dependencies(vec![2]),
        ];
        let scored = calc().analyze_tasks(&tasks).unwrap();
        assert_eq!(scored.len(), 4);
        for pair in scored.windows(2) {
            assert!(pair[0].priority_score() >= pair[1].priority_score());
        }
        for task in &scored {
            assert!((0.0..=100.0).contains(&task.priority_score()));
        }
        assert_eq!(scored[0].task.id, Some(2));
        assert_eq!(scored.last().unwrap().task.id, Some(1));
        // Task 2 is blocking two others
        assert_eq!(scored[0].score.score_breakdown.dependency_raw, 50.0);
    }

    #[test]
    fn test_analyze_sorted_and_bounded_for_any_valid_weights() {
        let tasks = vec![
            make_task(1, 40, 20.0, 2),
            make_task(2, -30, 0.5, 10),
            make_task(3, 7, 6.0, 6).with_dependencies(vec![2]),
            make_task(4, 0, 0.5, 10).with_dependencies(vec![2]),
            make_task(5, 2, 3.0, 1).with_dependencies(vec![2, 4]),
            make_task(6, 200, 100.0, 1),
        ];
        let mappings: Vec<Vec<(&str, f64)>> = vec![
            vec![],
            vec![("urgency", 1.0), ("importance", 0.0), ("effort", 0.0), ("dependencies", 0.0)],
            vec![("urgency", 0.0), ("importance", 1.0), ("effort", 0.0), ("dependencies", 0.0)],
            vec![("urgency", 0.0), ("importance", 0.0), ("effort", 1.0), ("dependencies", 0.0)],
            vec![("urgency", 0.0), ("importance", 0.0), ("effort", 0.0), ("dependencies", 1.0)],
            vec![("urgency", 0.25), ("importance", 0.25), ("effort", 0.25), ("dependencies", 0.25)],
            vec![("urgency", 0.1), ("importance", 0.6)],
        ];

        for mapping in &mappings {
            let calc = PriorityCalculator::new(Some(&weights_map(mapping)))
                .unwrap()
                .with_clock(FixedClock::new(today()));
            let scored = calc.analyze_tasks(&tasks).unwrap();

            assert_eq!(scored.len(), tasks.len(), "weights {:?}", mapping);
            for pair in scored.windows(2) {
                assert!(
                    pair[0].priority_score() >= pair[1].priority_score(),
                    "weights {:?}",
                    mapping
                );
            }
            for task in &scored {
                let score = task.priority_score();
                assert!(
                    (0.0..=100.0).contains(&score),
                    "weights {:?} gave {}",
                    mapping,
                    score
                );
            }
        }
    }

    #[test]
    fn test_nan_weight_never_reaches_scoring() {
        let nan = weights_map(&[("urgency", f64::NAN)]);
        assert!(matches!(
            PriorityCalculator::new(Some(&nan)),
            Err(WeightsError::NonFinite { .. })
        ));

        let weights = Weights {
            dependencies: f64::NAN,
            ..Weights::default()
        };
        assert!(PriorityCalculator::from_weights(weights).is_err());
    }

    #[test]
    fn test_analyze_empty_list() {
        assert_eq!(calc().analyze_tasks(&[]), Err(ScoringError::EmptyTaskList));
    }

    #[test]
    fn test_analyze_missing_required_fields() {
        let mut task = make_task(7, 1, 1.0, 5);
        task.title = None;
        task.importance = None;
        let err = calc().analyze_tasks(&[task]).unwrap_err();
        assert_eq!(
            err,
            ScoringError::MissingFields {
                task_id: "7".to_string(),
                fields: vec!["title", "importance"],
            }
        );
        assert_eq!(err.to_string(), "Task 7 missing required fields: title, importance");
    }

    #[test]
    fn test_analyze_aggregates_all_failures() {
        let mut bad_date = make_task(1, 1, 1.0, 5);
        bad_date.due_date = Some(json!("tomorrow"));
        let mut bad_importance = make_task(2, 1, 1.0, 5);
        bad_importance.importance = Some(json!(42));
        let good = make_task(3, 1, 1.0, 5);

        let err = calc()
            .analyze_tasks(&[bad_date, good, bad_importance])
            .unwrap_err();
        match &err {
            ScoringError::BatchFailed(failures) => {
                assert_eq!(failures.len(), 2);
                assert_eq!(failures[0].task_id, "1");
                assert_eq!(failures[1].task_id, "2");
                assert_eq!(failures[1].task_title, "Task 2");
            }
            other => panic!("unexpected error {:?}", other),
        }
        let message = err.to_string();
        assert!(message.starts_with("Failed to analyze 2 task(s):\n"));
        assert!(message.contains("Task 1 (Task 1): Invalid due_date format: tomorrow"));
        assert!(message.contains("Task 2 (Task 2): Invalid importance value: 42"));
    }

    #[test]
    fn test_analyze_ties_are_deterministic() {
        let tasks = vec![make_task(3, 10, 5.0, 5), make_task(1, 10, 5.0, 5)];
        let first = calc().analyze_tasks(&tasks).unwrap();
        let second = calc().analyze_tasks(&tasks).unwrap();
        let ids = |v: &[ScoredTask]| v.iter().map(|t| t.task.id).collect::<Vec<_>>();
        assert_eq!(ids(&first), vec![Some(3), Some(1)]);
        assert_eq!(ids(&first), ids(&second));
    }

    fn explain(task: TaskInput, dependent_count: usize) -> String {
        let calc = calc();
        let score = calc.calculate_priority_score(&task, dependent_count).unwrap();
        calc.generate_task_explanation(&ScoredTask { task, score })
    }

    #[test]
    fn test_explanation_overdue_tiers() {
        assert_eq!(
            explain(make_task(1, -1, 5.0, 5), 0),
            "This task is overdue by 1 day (CRITICAL)."
        );
        assert_eq!(
            explain(make_task(1, -4, 5.0, 5), 0),
            "This task is overdue by 4 days (URGENT)."
        );
        assert_eq!(
            explain(make_task(1, -10, 5.0, 5), 0),
            "This task is overdue by 10 days (CRITICAL - requires immediate attention)."
        );
    }

    #[test]
    fn test_explanation_clause_order() {
        assert_eq!(
            explain(make_task(1, 0, 1.5, 9), 2),
            "This task is due TODAY (URGENT), high importance (9/10), quick win (1.5h), blocks multiple tasks."
        );
        assert_eq!(
            explain(make_task(1, 2, 5.0, 6), 1),
            "This task is due in 2 day(s) (URGENT), medium importance (6/10), blocks other task(s)."
        );
    }

    #[test]
    fn test_explanation_hours_keep_decimal_point() {
        assert_eq!(
            explain(make_task(1, 20, 2.0, 4), 0),
            "This task is quick win (2.0h)."
        );
        assert_eq!(
            explain(make_task(1, 20, 0.25, 4), 0),
            "This task is quick win (0.25h)."
        );
    }

    #[test]
    fn test_explanation_fallback() {
        let reason = explain(make_task(1, 20, 10.0, 4), 0);
        assert!(reason.starts_with("This task is balanced priority (score: "));
        assert!(reason.ends_with(")."));
    }

    #[test]
    fn test_balance_explanation() {
        let default_balance = calc().balance_explanation();
        assert_eq!(default_balance.balance_type, BalanceType::UrgencyFocused);
        assert!(default_balance.description.contains("Urgency (40%)"));
        assert!(default_balance.description.contains("importance (30%)"));

        let even = PriorityCalculator::new(Some(&weights_map(&[
            ("urgency", 0.35),
            ("importance", 0.35),
        ])))
        .unwrap()
        .balance_explanation();
        assert_eq!(even.balance_type, BalanceType::Balanced);
        assert!(even.description.contains("35% each"));

        let importance = PriorityCalculator::new(Some(&weights_map(&[
            ("urgency", 0.2),
            ("importance", 0.5),
        ])))
        .unwrap()
        .balance_explanation();
        assert_eq!(importance.balance_type, BalanceType::ImportanceFocused);
        assert_eq!(importance.note, BALANCE_NOTE);
    }

    #[test]
    fn test_suggest_top_three_with_reasons() {
        let tasks: Vec<TaskInput> = (1..=5).map(|id| make_task(id, id * 3, 2.0, 5)).collect();
        let suggestions = calc()
            .suggest_tasks(&tasks, DEFAULT_SUGGESTION_COUNT)
            .unwrap();
        assert_eq!(suggestions.len(), 3);
        assert_eq!(suggestions[0].task.id, Some(1));
        assert!(suggestions[0].reason.starts_with("This task is "));
        assert!(suggestions[0].task.priority_score >= suggestions[1].task.priority_score);
    }

    #[test]
    fn test_suggest_rejects_cycles_and_missing_refs() {
        let cyclic = vec![
            make_task(1, 1, 1.0, 5).with_dependencies(vec![2]),
            make_task(2, 1, 1.0, 5).with_dependencies(vec![1]),
        ];
        assert!(matches!(
            calc().suggest_tasks(&cyclic, 3),
            Err(ScoringError::Dependency(DependencyError::CircularDependency(_)))
        ));

        let dangling = vec![make_task(1, 1, 1.0, 5).with_dependencies(vec![9])];
        let err = calc().suggest_tasks(&dangling, 3).unwrap_err();
        assert_eq!(err.to_string(), "Task 1 references non-existent dependency 9");
    }
}
