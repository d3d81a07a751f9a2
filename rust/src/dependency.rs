//! Structural checks over a batch of tasks: references, self-dependencies,
//! cycles and dependent counts.
//!
//! Edges point from a task to the tasks it depends on. Every function here is
//! pure and reports problems through its return value.

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::models::{TaskId, TaskInput};

/// Minimal view of a task needed for graph checks.
pub trait DependencyNode {
    fn node_id(&self) -> Option<TaskId>;
    fn node_dependencies(&self) -> &[TaskId];
}

impl DependencyNode for TaskInput {
    fn node_id(&self) -> Option<TaskId> {
        self.id
    }

    fn node_dependencies(&self) -> &[TaskId] {
        &self.dependencies
    }
}

impl DependencyNode for (TaskId, Vec<TaskId>) {
    fn node_id(&self) -> Option<TaskId> {
        Some(self.0)
    }

    fn node_dependencies(&self) -> &[TaskId] {
        &self.1
    }
}

/// Structural problems in a task batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependencyError {
    #[error("Task {task} references non-existent dependency {dependency}")]
    MissingDependency { task: String, dependency: TaskId },
    #[error("Task {0} cannot depend on itself")]
    SelfDependency(TaskId),
    #[error("Circular dependency found: {}", format_cycle(.0))]
    CircularDependency(Vec<TaskId>),
}

impl DependencyError {
    /// The offending cycle, if this is a cycle error.
    pub fn cycle(&self) -> Option<&[TaskId]> {
        match self {
            DependencyError::CircularDependency(path) => Some(path),
            _ => None,
        }
    }
}

/// Render a cycle as `1 -> 2 -> 3 -> 1`.
pub fn format_cycle(path: &[TaskId]) -> String {
    path.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Check that every dependency exists in the batch and no task depends on
/// itself.
///
/// Stops at the first violation, scanning tasks in order and each task's
/// dependencies in list order.
pub fn validate_dependencies<N: DependencyNode>(tasks: &[N]) -> Result<(), DependencyError> {
    let ids: FxHashSet<TaskId> = tasks.iter().filter_map(|t| t.node_id()).collect();

    for task in tasks {
        let task_id = task.node_id();
        for &dep in task.node_dependencies() {
            if !ids.contains(&dep) {
                return Err(DependencyError::MissingDependency {
                    task: task_id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "unknown".to_string()),
                    dependency: dep,
                });
            }
            if task_id == Some(dep) {
                return Err(DependencyError::SelfDependency(dep));
            }
        }
    }

    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    OnStack,
    Done,
}

/// Find a dependency cycle, if any.
///
/// Returns the cycle as a closed path (`[1, 2, 3, 1]` for 1 → 2 → 3 → 1).
/// Dependencies on ids outside the batch are ignored here. Searches start from
/// tasks in input order; when several cycles exist, which one is reported is
/// not part of the contract.
pub fn detect_circular_dependencies<N: DependencyNode>(tasks: &[N]) -> Option<Vec<TaskId>> {
    let ids: FxHashSet<TaskId> = tasks.iter().filter_map(|t| t.node_id()).collect();

    let mut order: Vec<TaskId> = Vec::with_capacity(tasks.len());
    let mut adjacency: FxHashMap<TaskId, Vec<TaskId>> = FxHashMap::default();
    for task in tasks {
        let Some(id) = task.node_id() else {
            continue;
        };
        let edges = adjacency.entry(id).or_insert_with(|| {
            order.push(id);
            Vec::new()
        });
        edges.extend(
            task.node_dependencies()
                .iter()
                .copied()
                .filter(|dep| ids.contains(dep)),
        );
    }

    let mut marks: FxHashMap<TaskId, Mark> = FxHashMap::default();
    // Each frame is (node, index of the next edge to follow). The frames double
    // as the current DFS path.
    let mut stack: Vec<(TaskId, usize)> = Vec::new();

    for &start in &order {
        if marks.contains_key(&start) {
            continue;
        }
        marks.insert(start, Mark::OnStack);
        stack.push((start, 0));

        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            let next = adjacency
                .get(&node)
                .and_then(|edges| edges.get(frame.1))
                .copied();
            frame.1 += 1;

            match next {
                Some(dep) => match marks.get(&dep).copied() {
                    None => {
                        marks.insert(dep, Mark::OnStack);
                        stack.push((dep, 0));
                    }
                    Some(Mark::OnStack) => {
                        let start_at = stack
                            .iter()
                            .position(|&(id, _)| id == dep)
                            .unwrap_or(0);
                        let mut cycle: Vec<TaskId> =
                            stack[start_at..].iter().map(|&(id, _)| id).collect();
                        cycle.push(dep);
                        return Some(cycle);
                    }
                    Some(Mark::Done) => {}
                },
                None => {
                    marks.insert(node, Mark::Done);
                    stack.pop();
                }
            }
        }
    }

    None
}

/// Count, for every task in the batch, how many tasks list it as a dependency.
///
/// Every batch id starts at 0; ids outside the batch are not counted.
pub fn count_dependents<N: DependencyNode>(tasks: &[N]) -> FxHashMap<TaskId, usize> {
    let mut counts: FxHashMap<TaskId, usize> =
        tasks.iter().filter_map(|t| t.node_id()).map(|id| (id, 0)).collect();

    for task in tasks {
        for dep in task.node_dependencies() {
            if let Some(count) = counts.get_mut(dep) {
                *count += 1;
            }
        }
    }

    counts
}

/// Reference check followed by cycle detection.
pub fn validate_graph<N: DependencyNode>(tasks: &[N]) -> Result<(), DependencyError> {
    validate_dependencies(tasks)?;
    match detect_circular_dependencies(tasks) {
        Some(cycle) => Err(DependencyError::CircularDependency(cycle)),
        None => Ok(()),
    }
}
