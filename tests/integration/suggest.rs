//! Suggest requests: sample batch, supplied batches and limits.

use serde_json::json;

use task_analyzer::api::{analyze_json, sample_tasks, suggest, suggest_json, RequestContext, SuggestRequest};
use task_analyzer::{Config, Strategy};

use crate::fixtures::{analyze_body, assert_ranked, ctx, generated_at, mixed_batch, today};

#[test]
fn test_empty_body_suggests_from_sample_batch() {
    let response = suggest_json("", &ctx()).unwrap();
    assert_eq!(response.strategy, Strategy::SmartBalance);
    assert_eq!(response.limit, 3);
    assert_eq!(response.tasks.len(), 3);
    assert_eq!(response.summary.total_tasks, sample_tasks(today()).len());
    assert_eq!(response.generated_at, generated_at());
    assert_ranked(&response.tasks);
}

#[test]
fn test_sample_batch_follows_today() {
    let later = today() + chrono::Duration::days(100);
    let response = suggest(&SuggestRequest::default(), &ctx().with_today(later)).unwrap();
    for task in &response.tasks {
        if let Some(due) = task.task.due_date {
            assert!(due > later);
        }
    }
}

#[test]
fn test_strategies_metadata_included() {
    let value = serde_json::to_value(suggest_json("{}", &ctx()).unwrap()).unwrap();
    let names: Vec<&str> = value["strategies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["smart_balance", "fastest_wins", "high_impact", "deadline_driven"]
    );
    assert!(value["strategies"][0]["weights"]["urgency"].is_number());
    assert!(value["strategies"][0]["description"].is_string());
}

#[test]
fn test_supplied_tasks_match_analyze_prefix() {
    let full = analyze_json(&analyze_body("high_impact", mixed_batch()), &ctx()).unwrap();
    let body = json!({"strategy": "high_impact", "limit": 4, "tasks": mixed_batch()}).to_string();
    let top = suggest_json(&body, &ctx()).unwrap();

    assert_eq!(top.limit, 4);
    assert_eq!(top.tasks, full.tasks[..4].to_vec());
    assert_eq!(top.summary, full.summary);
}

#[test]
fn test_non_positive_limit_returns_one() {
    for limit in [0, -1, -100] {
        let body = json!({ "limit": limit }).to_string();
        let response = suggest_json(&body, &ctx()).unwrap();
        assert_eq!(response.limit, 1);
        assert_eq!(response.tasks.len(), 1);
    }
}

#[test]
fn test_configured_defaults_apply() {
    let config = Config {
        default_strategy: Strategy::FastestWins,
        suggest_limit: 2,
        pretty: false,
    };
    let mut context = RequestContext::now(&config).with_today(today());
    context.generated_at = generated_at();

    let response = suggest(&SuggestRequest::default(), &context).unwrap();
    assert_eq!(response.strategy, Strategy::FastestWins);
    assert_eq!(response.tasks.len(), 2);

    // The request body wins over config.
    let body = json!({"strategy": "deadline_driven", "limit": 5}).to_string();
    let response = suggest_json(&body, &context).unwrap();
    assert_eq!(response.strategy, Strategy::DeadlineDriven);
    assert_eq!(response.limit, 5);
}

#[test]
fn test_invalid_supplied_batch_rejected() {
    let body = json!({"tasks": [{"id": 1, "title": "x", "dependencies": [2]}]}).to_string();
    let err = suggest_json(&body, &ctx()).unwrap_err();
    assert!(err.is_client_error());
}

#[test]
fn test_suggest_is_stateless() {
    // A previous analyze call must not change what suggest sees.
    analyze_json(&analyze_body("smart_balance", mixed_batch()), &ctx()).unwrap();
    let first = suggest_json("", &ctx()).unwrap();
    let second = suggest_json("", &ctx()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.summary.total_tasks, sample_tasks(today()).len());
}
