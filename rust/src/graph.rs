//! Node/edge view of the dependency graph for visualization.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::dependency::{detect_circular_dependencies, DependencyNode};
use crate::models::{TaskId, TaskInput};

/// Maximum number of title characters shown in a node label.
const LABEL_TITLE_CHARS: usize = 30;

const UNTITLED: &str = "Untitled";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: TaskId,
    pub label: String,
    pub title: String,
    pub in_cycle: bool,
    pub dependencies: Vec<TaskId>,
}

/// Edge from a dependency to the task that needs it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub from: TaskId,
    pub to: TaskId,
    pub in_cycle: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub has_cycle: bool,
    /// Empty when there is no cycle.
    pub cycle_path: Vec<TaskId>,
}

/// Build the graph view of a batch.
///
/// Tasks without an id are skipped. Dependencies on ids outside the batch stay
/// in the node's list but get no edge. An edge is flagged when both of its
/// ends lie on the reported cycle.
pub fn dependency_graph(tasks: &[TaskInput]) -> GraphData {
    let cycle_path = detect_circular_dependencies(tasks).unwrap_or_default();
    let on_cycle: FxHashSet<TaskId> = cycle_path.iter().copied().collect();
    let batch_ids: FxHashSet<TaskId> = tasks.iter().filter_map(|t| t.node_id()).collect();

    let mut nodes = Vec::with_capacity(tasks.len());
    let mut edges = Vec::new();

    for task in tasks {
        let Some(id) = task.id else {
            continue;
        };
        let title = task.title.as_deref().unwrap_or(UNTITLED);
        let in_cycle = on_cycle.contains(&id);

        nodes.push(GraphNode {
            id,
            label: format!(
                "{}: {}",
                id,
                title.chars().take(LABEL_TITLE_CHARS).collect::<String>()
            ),
            title: title.to_string(),
            in_cycle,
            dependencies: task.dependencies.clone(),
        });

        edges.extend(
            task.dependencies
                .iter()
                .filter(|dep| batch_ids.contains(*dep))
                .map(|&dep| GraphEdge {
                    from: dep,
                    to: id,
                    in_cycle: in_cycle && on_cycle.contains(&dep),
                }),
        );
    }

    GraphData {
        nodes,
        edges,
        has_cycle: !cycle_path.is_empty(),
        cycle_path,
    }
}
