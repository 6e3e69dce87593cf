//! Cycle detection and penalties on whole batches.

use std::collections::HashSet;

use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;
use serde_json::json;

use task_analyzer::api::{analyze, analyze_json, AnalyzeRequest};
use task_analyzer::scoring::CYCLE_PENALTY;
use task_analyzer::{TaskId, TaskInput};

use crate::fixtures::{analyze_body, assert_ranked, by_title, ctx, cyclic_batch};

#[test]
fn test_cycle_is_reported_not_rejected() {
    let response = analyze_json(&analyze_body("smart_balance", cyclic_batch()), &ctx()).unwrap();
    assert_eq!(response.tasks.len(), 4);
    assert_ranked(&response.tasks);

    for title in ["A", "B", "C"] {
        let task = by_title(&response.tasks, title);
        assert!(task.cycle_issue, "{} should be on the cycle", title);
        assert!(task.explanation.ends_with("Part of dependency cycle"));
    }
    let bystander = by_title(&response.tasks, "Bystander");
    assert!(!bystander.cycle_issue);
    assert!(!bystander.explanation.contains("cycle"));
}

#[test]
fn test_cycle_members_sink_below_bystander() {
    let response = analyze_json(&analyze_body("smart_balance", cyclic_batch()), &ctx()).unwrap();
    assert_eq!(response.tasks[0].task.title, "Bystander");

    // A unblocks B and the bystander, so it has the top dependency score but
    // still pays the penalty.
    let a = by_title(&response.tasks, "A");
    assert_eq!(a.components.num_dependents, 2);
    assert_eq!(a.components.dep_score, 1.0);
    let unpenalised = 0.35 * 0.1 + 0.35 * 0.5 + 0.15 * 0.75 + 0.15 * 1.0;
    assert!((a.score - unpenalised * CYCLE_PENALTY * 100.0).abs() < 0.006);
}

#[test]
fn test_disjoint_cycles() {
    let tasks = json!([
        {"id": 1, "title": "p", "dependencies": [2]},
        {"id": 2, "title": "q", "dependencies": [1]},
        {"id": 3, "title": "free"},
        {"id": 4, "title": "x", "dependencies": [5]},
        {"id": 5, "title": "y", "dependencies": [6]},
        {"id": 6, "title": "z", "dependencies": [4, 3]}
    ]);
    let response = analyze_json(&analyze_body("deadline_driven", tasks), &ctx()).unwrap();
    let flagged: HashSet<&str> = response
        .tasks
        .iter()
        .filter(|t| t.cycle_issue)
        .map(|t| t.task.title.as_str())
        .collect();
    assert_eq!(flagged, HashSet::from(["p", "q", "x", "y", "z"]));
}

#[test]
fn test_tasks_downstream_of_cycle_are_not_members() {
    // 1 -> 2 -> 3 -> 2, and 4 depends on 3: only 2 and 3 form a cycle.
    let tasks = json!([
        {"id": 1, "title": "root"},
        {"id": 2, "title": "loop head", "dependencies": [1, 3]},
        {"id": 3, "title": "loop tail", "dependencies": [2]},
        {"id": 4, "title": "after", "dependencies": [3]}
    ]);
    let response = analyze_json(&analyze_body("smart_balance", tasks), &ctx()).unwrap();
    assert!(!by_title(&response.tasks, "root").cycle_issue);
    assert!(by_title(&response.tasks, "loop head").cycle_issue);
    assert!(by_title(&response.tasks, "loop tail").cycle_issue);
    assert!(!by_title(&response.tasks, "after").cycle_issue);
}

#[test]
fn test_repeated_dependency_counts_once() {
    let tasks = json!([
        {"id": 1, "title": "base"},
        {"id": 2, "title": "user", "dependencies": [1, 1, 1]}
    ]);
    let response = analyze_json(&analyze_body("smart_balance", tasks), &ctx()).unwrap();
    let base = by_title(&response.tasks, "base");
    assert_eq!(base.components.num_dependents, 1);
    assert_eq!(by_title(&response.tasks, "user").task.dependencies, vec![TaskId(1)]);
}

/// Deterministic pseudo-random batches checked against petgraph's SCC search.
#[test]
fn test_cycle_flags_match_strongly_connected_components() {
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move |bound: u64| {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        seed % bound
    };

    for round in 0..40 {
        let n = 5 + next(40);
        let mut edges = Vec::new();
        let inputs: Vec<TaskInput> = (1..=n)
            .map(|id| {
                let deps: Vec<i64> = (0..next(3))
                    .map(|_| 1 + next(n) as i64)
                    .filter(|&dep| dep != id as i64)
                    .collect();
                for &dep in &deps {
                    edges.push((dep as u64, id));
                }
                TaskInput::new(&format!("t{}", id))
                    .with_id(id as i64)
                    .with_dependencies(&deps)
            })
            .collect();

        let mut graph = DiGraph::<u64, ()>::new();
        let nodes: Vec<_> = (1..=n).map(|id| graph.add_node(id)).collect();
        for &(from, to) in &edges {
            graph.update_edge(nodes[from as usize - 1], nodes[to as usize - 1], ());
        }
        let expected: HashSet<TaskId> = tarjan_scc(&graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .flatten()
            .map(|node| TaskId(graph[node]))
            .collect();

        let request = AnalyzeRequest {
            strategy: None,
            tasks: inputs,
        };
        let response = analyze(&request, &ctx()).unwrap();
        let flagged: HashSet<TaskId> = response
            .tasks
            .iter()
            .filter(|t| t.cycle_issue)
            .map(|t| t.task.id)
            .collect();
        assert_eq!(flagged, expected, "round {}", round);
        assert_ranked(&response.tasks);
    }
}
