//! Suggestion feedback: statistics and learning-adjusted weights.
//!
//! Users mark suggestions as helpful or not. Once enough feedback exists, the
//! importance ratings of helpful tasks are compared with those of unhelpful
//! ones and the default weights are nudged one step towards importance or
//! towards effort.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::calculator::parse_importance;
use crate::config::Weights;
use crate::models::{TaskId, TaskInput};
use crate::scoring::round2;

/// Feedback entries needed before weights are adjusted.
pub const MIN_FEEDBACK_FOR_LEARNING: usize = 5;

/// Weight moved towards the favoured factor per adjustment.
pub const ADJUSTMENT_STEP: f64 = 0.05;

/// Importance difference (on the 1-10 scale) that triggers an adjustment.
const IMPORTANCE_MARGIN: f64 = 1.0;

/// Average importance assumed for a side with no rated tasks.
const NEUTRAL_IMPORTANCE: f64 = 5.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub task_id: TaskId,
    pub was_helpful: bool,
    #[serde(default)]
    pub feedback_notes: Option<String>,
}

impl FeedbackEntry {
    pub fn new(task_id: TaskId, was_helpful: bool) -> Self {
        Self {
            task_id,
            was_helpful,
            feedback_notes: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackStats {
    pub total_feedback: usize,
    pub helpful_count: usize,
    pub not_helpful_count: usize,
    /// Percentage of helpful entries, 0 when there is no feedback.
    pub helpful_rate: f64,
}

impl FeedbackStats {
    pub fn from_feedback(entries: &[FeedbackEntry]) -> Self {
        let total_feedback = entries.len();
        let helpful_count = entries.iter().filter(|e| e.was_helpful).count();
        let helpful_rate = if total_feedback > 0 {
            round2(helpful_count as f64 / total_feedback as f64 * 100.0)
        } else {
            0.0
        };
        Self {
            total_feedback,
            helpful_count,
            not_helpful_count: total_feedback - helpful_count,
            helpful_rate,
        }
    }
}

/// Mean importance over the distinct known tasks in `ids`, `None` when none
/// of them can be rated.
fn average_importance(ids: &FxHashSet<TaskId>, importance: &FxHashMap<TaskId, i64>) -> Option<f64> {
    let ratings: Vec<i64> = ids
        .iter()
        .filter_map(|id| importance.get(id).copied())
        .collect();
    if ratings.is_empty() {
        return None;
    }
    Some(ratings.iter().sum::<i64>() as f64 / ratings.len() as f64)
}

/// Default weights nudged by user feedback, or `None` when there is not enough
/// signal to learn from.
///
/// The result always sums to 1.0.
pub fn adjusted_weights(feedback: &[FeedbackEntry], tasks: &[TaskInput]) -> Option<Weights> {
    if feedback.len() < MIN_FEEDBACK_FOR_LEARNING {
        return None;
    }

    let importance: FxHashMap<TaskId, i64> = tasks
        .iter()
        .filter_map(|task| {
            let id = task.id?;
            parse_importance(task.importance.as_ref())
                .ok()
                .map(|rating| (id, rating))
        })
        .collect();
    let known: FxHashSet<TaskId> = tasks.iter().filter_map(|task| task.id).collect();

    let (helpful, not_helpful): (Vec<&FeedbackEntry>, Vec<&FeedbackEntry>) =
        feedback.iter().partition(|entry| entry.was_helpful);
    let helpful: FxHashSet<TaskId> = helpful.iter().map(|e| e.task_id).collect();
    let not_helpful: FxHashSet<TaskId> = not_helpful.iter().map(|e| e.task_id).collect();

    if !helpful.iter().any(|id| known.contains(id)) {
        return None;
    }

    let helpful_avg = average_importance(&helpful, &importance).unwrap_or(NEUTRAL_IMPORTANCE);
    let not_helpful_avg =
        average_importance(&not_helpful, &importance).unwrap_or(NEUTRAL_IMPORTANCE);

    let mut weights = Weights::default();
    if helpful_avg > not_helpful_avg + IMPORTANCE_MARGIN {
        weights.importance = (weights.importance + ADJUSTMENT_STEP).min(0.6);
        weights.urgency = (weights.urgency - ADJUSTMENT_STEP * 0.5).max(0.2);
        weights.effort = (weights.effort - ADJUSTMENT_STEP * 0.25).max(0.05);
        weights.dependencies = (weights.dependencies - ADJUSTMENT_STEP * 0.25).max(0.05);
    } else if helpful_avg < not_helpful_avg - IMPORTANCE_MARGIN {
        weights.effort = (weights.effort + ADJUSTMENT_STEP).min(0.4);
        weights.importance = (weights.importance - ADJUSTMENT_STEP * 0.5).max(0.2);
        weights.urgency = (weights.urgency - ADJUSTMENT_STEP * 0.25).max(0.2);
        weights.dependencies = (weights.dependencies - ADJUSTMENT_STEP * 0.25).max(0.05);
    }

    Some(weights.normalized())
}
