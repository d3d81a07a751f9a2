//! Python bindings.
//!
//! Tasks, scores and views cross the boundary as JSON text so the host can
//! pass its request payloads through unchanged. Every error surfaces as
//! `ValueError` carrying the Rust error message.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use chrono::NaiveDate;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;

use crate::calculator::{PriorityCalculator, DEFAULT_SUGGESTION_COUNT};
use crate::clock::{Clock, FixedClock, SystemClock};
use crate::dependency;
use crate::feedback::{self, FeedbackEntry, FeedbackStats};
use crate::graph;
use crate::models::{ScoredTask, TaskId, TaskInput};

fn value_error(err: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn from_json<T: DeserializeOwned>(json: &str, what: &str) -> PyResult<T> {
    serde_json::from_str(json).map_err(|e| value_error(format!("Invalid {} JSON: {}", what, e)))
}

fn to_json<T: Serialize>(value: &T) -> PyResult<String> {
    serde_json::to_string(value).map_err(value_error)
}

type DynClock = Box<dyn Clock + Send + Sync>;

/// Priority calculator (PyO3 wrapper).
#[pyclass(name = "PriorityCalculator")]
pub struct PyPriorityCalculator {
    inner: PriorityCalculator<DynClock>,
}

#[pymethods]
impl PyPriorityCalculator {
    /// Create a calculator.
    ///
    /// # Arguments
    /// * `weights` - Optional overrides merged over the default weights
    /// * `today` - Pin the reference date instead of reading the local clock
    /// * `verbosity` - Logging level (0-3)
    ///
    /// # Raises
    /// * ValueError if the merged weights are invalid
    #[new]
    #[pyo3(signature = (weights=None, today=None, verbosity=0))]
    fn new(
        weights: Option<HashMap<String, f64>>,
        today: Option<NaiveDate>,
        verbosity: u8,
    ) -> PyResult<Self> {
        let calculator = PriorityCalculator::new(weights.as_ref()).map_err(value_error)?;
        let clock: DynClock = match today {
            Some(date) => Box::new(FixedClock::new(date)),
            None => Box::new(SystemClock),
        };
        Ok(Self {
            inner: calculator.with_clock(clock).with_verbosity(verbosity),
        })
    }

    #[getter]
    fn weights(&self) -> HashMap<String, f64> {
        self.inner.weights().to_map()
    }

    /// Score one task (JSON object) given its dependent count.
    #[pyo3(signature = (task_json, dependent_count=0))]
    fn calculate_priority_score(&self, task_json: &str, dependent_count: usize) -> PyResult<String> {
        let task: TaskInput = from_json(task_json, "task")?;
        let score = self
            .inner
            .calculate_priority_score(&task, dependent_count)
            .map_err(value_error)?;
        to_json(&score)
    }

    /// Score a JSON array of tasks; returns them sorted, highest priority first.
    fn analyze_tasks(&self, tasks_json: &str) -> PyResult<String> {
        let tasks: Vec<TaskInput> = from_json(tasks_json, "task list")?;
        let scored = self.inner.analyze_tasks(&tasks).map_err(value_error)?;
        to_json(&scored)
    }

    /// Top `limit` tasks with a reason for each.
    #[pyo3(signature = (tasks_json, limit=DEFAULT_SUGGESTION_COUNT))]
    fn suggest_tasks(&self, tasks_json: &str, limit: usize) -> PyResult<String> {
        let tasks: Vec<TaskInput> = from_json(tasks_json, "task list")?;
        let suggestions = self
            .inner
            .suggest_tasks(&tasks, limit)
            .map_err(value_error)?;
        to_json(&suggestions)
    }

    fn eisenhower_matrix(&self, tasks_json: &str) -> PyResult<String> {
        let tasks: Vec<TaskInput> = from_json(tasks_json, "task list")?;
        let matrix = self.inner.eisenhower_matrix(&tasks).map_err(value_error)?;
        to_json(&matrix)
    }

    /// Explain a scored task as returned by `analyze_tasks`.
    fn generate_task_explanation(&self, scored_task_json: &str) -> PyResult<String> {
        let scored: ScoredTask = from_json(scored_task_json, "scored task")?;
        Ok(self.inner.generate_task_explanation(&scored))
    }

    fn get_balance_explanation(&self) -> PyResult<String> {
        to_json(&self.inner.balance_explanation())
    }

    fn __repr__(&self) -> String {
        format!(
            "PriorityCalculator(weights={}, verbosity={})",
            self.inner.weights(),
            self.inner.verbosity()
        )
    }
}

/// Check references and self-dependencies.
///
/// # Returns
/// * `(True, "")` when valid, else `(False, message)` for the first violation
#[pyfunction]
fn validate_dependencies(tasks_json: &str) -> PyResult<(bool, String)> {
    let tasks: Vec<TaskInput> = from_json(tasks_json, "task list")?;
    Ok(match dependency::validate_dependencies(&tasks) {
        Ok(()) => (true, String::new()),
        Err(e) => (false, e.to_string()),
    })
}

/// # Returns
/// * `(has_cycle, cycle_path)`, the path empty when there is no cycle
#[pyfunction]
fn detect_circular_dependencies(tasks_json: &str) -> PyResult<(bool, Vec<TaskId>)> {
    let tasks: Vec<TaskInput> = from_json(tasks_json, "task list")?;
    Ok(match dependency::detect_circular_dependencies(&tasks) {
        Some(path) => (true, path),
        None => (false, Vec::new()),
    })
}

#[pyfunction]
fn count_dependents(tasks_json: &str) -> PyResult<HashMap<TaskId, usize>> {
    let tasks: Vec<TaskInput> = from_json(tasks_json, "task list")?;
    Ok(dependency::count_dependents(&tasks).into_iter().collect())
}

#[pyfunction]
fn dependency_graph(tasks_json: &str) -> PyResult<String> {
    let tasks: Vec<TaskInput> = from_json(tasks_json, "task list")?;
    to_json(&graph::dependency_graph(&tasks))
}

#[pyfunction]
fn feedback_stats(feedback_json: &str) -> PyResult<String> {
    let entries: Vec<FeedbackEntry> = from_json(feedback_json, "feedback")?;
    to_json(&FeedbackStats::from_feedback(&entries))
}

/// Learning-adjusted weights, or None when there is too little feedback.
#[pyfunction]
fn adjusted_weights(
    feedback_json: &str,
    tasks_json: &str,
) -> PyResult<Option<HashMap<String, f64>>> {
    let entries: Vec<FeedbackEntry> = from_json(feedback_json, "feedback")?;
    let tasks: Vec<TaskInput> = from_json(tasks_json, "task list")?;
    Ok(feedback::adjusted_weights(&entries, &tasks).map(|weights| weights.to_map()))
}

/// The taskscore.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyPriorityCalculator>()?;

    // Dependency validation
    m.add_function(wrap_pyfunction!(validate_dependencies, m)?)?;
    m.add_function(wrap_pyfunction!(detect_circular_dependencies, m)?)?;
    m.add_function(wrap_pyfunction!(count_dependents, m)?)?;
    m.add_function(wrap_pyfunction!(dependency_graph, m)?)?;

    // Feedback
    m.add_function(wrap_pyfunction!(feedback_stats, m)?)?;
    m.add_function(wrap_pyfunction!(adjusted_weights, m)?)?;

    Ok(())
}
