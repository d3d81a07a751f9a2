//! Ordering of scored tasks.

use std::cmp::Ordering;

use crate::models::ScoredTask;

/// Compare f64 values for sorting, treating NaN as equal to everything.
pub fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Sort tasks by priority score, highest first.
///
/// The sort is stable: tasks with equal scores keep their input order, so a
/// fixed input always produces the same output.
pub fn sort_by_priority(tasks: &mut [ScoredTask]) {
    tasks.sort_by(|a, b| cmp_f64(b.priority_score(), a.priority_score()));
}
