//! Performance checks on large batches.
//!
//! Thresholds are generous so the tests stay reliable on slow CI machines in
//! debug builds; the pipeline is linear in tasks plus dependency edges.
//! Use `cargo test --test integration performance -- --nocapture` to see timings.

use std::time::{Duration, Instant};

use task_analyzer::api::{analyze, AnalyzeRequest};
use task_analyzer::TaskInput;

use crate::fixtures::{assert_ranked, ctx, generated_batch};

const MAX_LARGE_BATCH: Duration = Duration::from_secs(5);

#[test]
fn test_large_independent_batch() {
    let request = AnalyzeRequest {
        strategy: Some("smart_balance".to_string()),
        tasks: generated_batch(20_000),
    };

    let start = Instant::now();
    let response = analyze(&request, &ctx()).unwrap();
    let elapsed = start.elapsed();
    println!("20k independent tasks analyzed in {:?}", elapsed);

    assert_eq!(response.tasks.len(), 20_000);
    assert_ranked(&response.tasks);
    assert!(elapsed < MAX_LARGE_BATCH, "took {:?}", elapsed);
}

#[test]
fn test_deep_chain_does_not_overflow() {
    let n: i64 = 50_000;
    let mut tasks: Vec<TaskInput> = (1..=n)
        .map(|id| {
            let input = TaskInput::new(&format!("step {}", id)).with_id(id);
            if id > 1 {
                input.with_dependencies(&[id - 1])
            } else {
                input
            }
        })
        .collect();

    let start = Instant::now();
    let response = analyze(
        &AnalyzeRequest {
            strategy: None,
            tasks: tasks.clone(),
        },
        &ctx(),
    )
    .unwrap();
    println!("{}-task chain analyzed in {:?}", n, start.elapsed());
    assert!(response.tasks.iter().all(|t| !t.cycle_issue));

    // Closing the chain puts every task on one cycle.
    tasks[0] = tasks[0].clone().with_dependencies(&[n]);
    let response = analyze(
        &AnalyzeRequest {
            strategy: None,
            tasks,
        },
        &ctx(),
    )
    .unwrap();
    assert!(response.tasks.iter().all(|t| t.cycle_issue));

    let elapsed = start.elapsed();
    assert!(elapsed < MAX_LARGE_BATCH * 2, "took {:?}", elapsed);
}
