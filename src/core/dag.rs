//! Dependency graph for one analysis batch.
//!
//! Nodes are task ids; every dependency adds an edge from the prerequisite to
//! the dependent task. The graph may contain cycles: they are detected and
//! reported, never rejected.

use crate::core::task::{Task, TaskId};
use crate::alog_debug;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

/// The task dependency graph.
///
/// Uses petgraph's DiGraph with an index from TaskId to NodeIndex for fast
/// lookups. Edges point from prerequisite to dependent, so the out-degree of
/// a task is the number of tasks it unblocks.
pub struct DependencyGraph {
    /// The underlying directed graph.
    graph: DiGraph<TaskId, ()>,
    /// Index mapping from TaskId to NodeIndex.
    task_index: HashMap<TaskId, NodeIndex>,
}

impl DependencyGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            task_index: HashMap::new(),
        }
    }

    /// Build the graph for a validated batch.
    ///
    /// Dependencies naming ids outside the batch are skipped; validation
    /// rejects such batches before they get here.
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut dag = Self::new();
        for task in tasks {
            dag.add_task(task.id);
        }
        for task in tasks {
            for dep in &task.dependencies {
                dag.add_dependency(dep, &task.id);
            }
        }
        dag
    }

    /// Add a task node. Adding an existing id returns its current index.
    pub fn add_task(&mut self, id: TaskId) -> NodeIndex {
        if let Some(&index) = self.task_index.get(&id) {
            return index;
        }
        let index = self.graph.add_node(id);
        self.task_index.insert(id, index);
        index
    }

    /// Record that `dependent` waits for `prerequisite`.
    ///
    /// Returns false (and adds nothing) when either task is unknown, the edge
    /// already exists, or both ids are the same.
    pub fn add_dependency(&mut self, prerequisite: &TaskId, dependent: &TaskId) -> bool {
        if prerequisite == dependent {
            return false;
        }
        let (Some(&from), Some(&to)) = (
            self.task_index.get(prerequisite),
            self.task_index.get(dependent),
        ) else {
            return false;
        };
        if self.graph.find_edge(from, to).is_some() {
            return false;
        }
        self.graph.add_edge(from, to, ());
        true
    }

    /// Number of tasks in the graph.
    pub fn task_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of dependency edges in the graph.
    pub fn dependency_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// How many tasks depend on `id` (its out-degree).
    pub fn dependents_count(&self, id: &TaskId) -> usize {
        self.task_index
            .get(id)
            .map(|&index| self.graph.edges_directed(index, Direction::Outgoing).count())
            .unwrap_or(0)
    }

    /// Largest out-degree over the batch (0 for an empty graph).
    pub fn max_dependents(&self) -> usize {
        self.graph
            .node_indices()
            .map(|index| self.graph.edges_directed(index, Direction::Outgoing).count())
            .max()
            .unwrap_or(0)
    }

    /// Per-task dependent counts divided by the batch maximum.
    ///
    /// Every score is 0.0 when no task is depended upon.
    pub fn dependency_scores(&self) -> HashMap<TaskId, f64> {
        let max = self.max_dependents();
        self.task_index
            .keys()
            .map(|id| {
                let score = if max == 0 {
                    0.0
                } else {
                    self.dependents_count(id) as f64 / max as f64
                };
                (*id, score)
            })
            .collect()
    }

    /// Tasks lying on at least one dependency cycle.
    pub fn cycle_members(&self) -> HashSet<TaskId> {
        CycleFinder::new(&self.graph).run()
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DependencyGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyGraph")
            .field("tasks", &self.task_count())
            .field("dependencies", &self.dependency_count())
            .finish()
    }
}

// ========== Cycle Detection ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeState {
    Unvisited,
    /// Discovered and still on the traversal stack.
    OnStack,
    /// Fully processed; never entered again.
    Done,
}

/// One suspended DFS call: the node and how far through its successors we are.
struct Frame {
    node: NodeIndex,
    successors: Vec<NodeIndex>,
    cursor: usize,
}

/// Iterative depth-first search with low-link bookkeeping (Tarjan).
///
/// A back edge to a node that is still on the stack closes a cycle; every
/// strongly connected group of more than one node is a set of cycle members.
/// Each node is entered exactly once, so the pass terminates on any graph
/// shape, including fully cyclic and disconnected ones.
struct CycleFinder<'a> {
    graph: &'a DiGraph<TaskId, ()>,
    state: Vec<NodeState>,
    discovered: Vec<usize>,
    low: Vec<usize>,
    stack: Vec<NodeIndex>,
    counter: usize,
    members: HashSet<TaskId>,
}

impl<'a> CycleFinder<'a> {
    fn new(graph: &'a DiGraph<TaskId, ()>) -> Self {
        let n = graph.node_count();
        Self {
            graph,
            state: vec![NodeState::Unvisited; n],
            discovered: vec![0; n],
            low: vec![0; n],
            stack: Vec::new(),
            counter: 0,
            members: HashSet::new(),
        }
    }

    fn run(mut self) -> HashSet<TaskId> {
        for root in self.graph.node_indices() {
            if self.state[root.index()] == NodeState::Unvisited {
                self.search_from(root);
            }
        }
        self.members
    }

    fn enter(&mut self, node: NodeIndex) -> Frame {
        let i = node.index();
        self.state[i] = NodeState::OnStack;
        self.discovered[i] = self.counter;
        self.low[i] = self.counter;
        self.counter += 1;
        self.stack.push(node);
        Frame {
            node,
            successors: self.graph.neighbors_directed(node, Direction::Outgoing).collect(),
            cursor: 0,
        }
    }

    fn search_from(&mut self, root: NodeIndex) {
        let mut frames = vec![self.enter(root)];

        while let Some(frame) = frames.last_mut() {
            let node = frame.node.index();

            let next = frame.successors.get(frame.cursor).copied();
            if let Some(next) = next {
                frame.cursor += 1;
                match self.state[next.index()] {
                    NodeState::Unvisited => {
                        let child = self.enter(next);
                        frames.push(child);
                    }
                    NodeState::OnStack => {
                        self.low[node] = self.low[node].min(self.discovered[next.index()]);
                    }
                    NodeState::Done => {}
                }
                continue;
            }

            frames.pop();
            if let Some(parent) = frames.last() {
                let p = parent.node.index();
                self.low[p] = self.low[p].min(self.low[node]);
            }
            if self.low[node] == self.discovered[node] {
                self.close_component(NodeIndex::new(node));
            }
        }
    }

    /// Pop the component rooted at `root` off the stack.
    fn close_component(&mut self, root: NodeIndex) {
        let mut component = Vec::new();
        while let Some(member) = self.stack.pop() {
            self.state[member.index()] = NodeState::Done;
            component.push(member);
            if member == root {
                break;
            }
        }
        if component.len() > 1 {
            let graph = self.graph;
            self.members.extend(
                component
                    .into_iter()
                    .filter_map(|index| graph.node_weight(index).copied()),
            );
        }
    }
}

/// Everything the scorer needs to know about the dependency structure.
#[derive(Debug, Clone, Default)]
pub struct DependencyAnalysis {
    /// How many tasks list each task as a dependency.
    pub num_dependents: HashMap<TaskId, usize>,
    /// `num_dependents` normalised by the batch maximum, in [0, 1].
    pub dep_scores: HashMap<TaskId, f64>,
    /// Tasks on at least one dependency cycle.
    pub cycle_members: HashSet<TaskId>,
}

impl DependencyAnalysis {
    /// Analyse a validated batch.
    pub fn of(tasks: &[Task]) -> Self {
        let dag = DependencyGraph::from_tasks(tasks);
        let analysis = Self {
            num_dependents: tasks
                .iter()
                .map(|t| (t.id, dag.dependents_count(&t.id)))
                .collect(),
            dep_scores: dag.dependency_scores(),
            cycle_members: dag.cycle_members(),
        };
        alog_debug!(
            "Dependency analysis: tasks={}, edges={}, max_dependents={}, in_cycles={}",
            dag.task_count(),
            dag.dependency_count(),
            dag.max_dependents(),
            analysis.cycle_members.len()
        );
        analysis
    }

    pub fn dep_score(&self, id: &TaskId) -> f64 {
        self.dep_scores.get(id).copied().unwrap_or(0.0)
    }

    pub fn dependents(&self, id: &TaskId) -> usize {
        self.num_dependents.get(id).copied().unwrap_or(0)
    }

    pub fn in_cycle(&self, id: &TaskId) -> bool {
        self.cycle_members.contains(id)
    }
}
