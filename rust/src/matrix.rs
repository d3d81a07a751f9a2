//! Eisenhower matrix: tasks split by urgency and importance.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::calculator::{coerce_importance, parse_due_date, PriorityCalculator, ScoringError};
use crate::clock::Clock;
use crate::log_checks;
use crate::models::TaskInput;
use crate::scoring::{importance_score, urgency_score};

/// Sub-score at or above which a task counts as urgent or important.
pub const QUADRANT_THRESHOLD: f64 = 50.0;

/// Importance assumed when a task carries none.
const DEFAULT_IMPORTANCE: i64 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    /// Urgent and important: do first.
    Q1,
    /// Important, not urgent: schedule.
    Q2,
    /// Urgent, not important: delegate.
    Q3,
    /// Neither.
    Q4,
}

impl Quadrant {
    pub fn classify(urgency: f64, importance: f64) -> Self {
        let urgent = urgency >= QUADRANT_THRESHOLD;
        let important = importance >= QUADRANT_THRESHOLD;
        match (urgent, important) {
            (true, true) => Quadrant::Q1,
            (false, true) => Quadrant::Q2,
            (true, false) => Quadrant::Q3,
            (false, false) => Quadrant::Q4,
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Quadrant::Q1 => "Q1",
            Quadrant::Q2 => "Q2",
            Quadrant::Q3 => "Q3",
            Quadrant::Q4 => "Q4",
        };
        write!(f, "{}", name)
    }
}

/// A task with its quadrant and the raw sub-scores that placed it there.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategorizedTask {
    #[serde(flatten)]
    pub task: TaskInput,
    pub quadrant: Quadrant,
    pub urgency_score: f64,
    pub importance_score: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EisenhowerMatrix {
    #[serde(rename = "Q1")]
    pub q1: Vec<CategorizedTask>,
    #[serde(rename = "Q2")]
    pub q2: Vec<CategorizedTask>,
    #[serde(rename = "Q3")]
    pub q3: Vec<CategorizedTask>,
    #[serde(rename = "Q4")]
    pub q4: Vec<CategorizedTask>,
}

impl EisenhowerMatrix {
    pub fn quadrant(&self, quadrant: Quadrant) -> &[CategorizedTask] {
        match quadrant {
            Quadrant::Q1 => &self.q1,
            Quadrant::Q2 => &self.q2,
            Quadrant::Q3 => &self.q3,
            Quadrant::Q4 => &self.q4,
        }
    }

    fn push(&mut self, task: CategorizedTask) {
        match task.quadrant {
            Quadrant::Q1 => self.q1.push(task),
            Quadrant::Q2 => self.q2.push(task),
            Quadrant::Q3 => self.q3.push(task),
            Quadrant::Q4 => self.q4.push(task),
        }
    }

    pub fn len(&self) -> usize {
        self.q1.len() + self.q2.len() + self.q3.len() + self.q4.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C: Clock> PriorityCalculator<C> {
    /// Place every task in a quadrant. Input order is kept within a quadrant.
    ///
    /// A task without an importance rating is treated as a 5. Ratings outside
    /// 1..=10 are clamped by the importance sub-score instead of failing.
    pub fn eisenhower_matrix(&self, tasks: &[TaskInput]) -> Result<EisenhowerMatrix, ScoringError> {
        let today = self.today();
        let mut matrix = EisenhowerMatrix::default();

        for task in tasks {
            let due_date = parse_due_date(task.due_date.as_ref())?;
            let importance = match task.importance.as_ref() {
                Some(value) => coerce_importance(value)?,
                None => DEFAULT_IMPORTANCE,
            };

            let urgency = urgency_score(due_date, today);
            let importance = importance_score(importance);
            let quadrant = Quadrant::classify(urgency, importance);
            log_checks!(
                self.verbosity(),
                "task {} placed in {} (urgency {:.2}, importance {:.2})",
                task.display_id(),
                quadrant,
                urgency,
                importance
            );

            matrix.push(CategorizedTask {
                task: task.clone(),
                quadrant,
                urgency_score: urgency,
                importance_score: importance,
            });
        }

        Ok(matrix)
    }
}
