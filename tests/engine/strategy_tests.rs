// Strategy tests - one scenario per execution shape
//
// Each test drives the engine end to end against recording fake providers
// and checks both the aggregated value and what the providers actually saw.

mod support;

use orrery_core::{Dependency, ExecutionPlan, Strategy, ToolCall};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use support::FakeProvider;

#[tokio::test]
async fn single_plan_returns_the_terminal_value() {
    let math = Arc::new(FakeProvider::new(vec!["add"]));
    let engine = support::engine_with(vec![("math", math.clone())]);

    let plan = ExecutionPlan::new(
        Strategy::Single,
        vec![
            ToolCall::new(1, "add")
                .with_parameter("a", json!(25))
                .with_parameter("b", json!(37)),
        ],
    );

    let result = engine.execute(&plan).await.expect("plan executes");

    assert!(result.overall_success);
    assert_eq!(result.final_value, Some(json!(62)));
    assert_eq!(result.outcomes.len(), 1);
    assert_eq!(math.invocations_of("add"), 1);
}

#[tokio::test(start_paused = true)]
async fn parallel_plan_collects_labeled_results_regardless_of_finish_order() {
    // factorial is made much slower than sqrt, so completion order is the
    // reverse of declaration order.
    let math = Arc::new(
        FakeProvider::new(vec!["factorial", "sqrt"]).delayed("factorial", Duration::from_secs(5)),
    );
    let engine = support::engine_with(vec![("math", math.clone())]);

    let plan = ExecutionPlan::new(
        Strategy::Parallel,
        vec![
            ToolCall::new(1, "factorial").with_parameter("n", json!(5)),
            ToolCall::new(2, "sqrt").with_parameter("n", json!(144)),
        ],
    );

    let result = engine.execute(&plan).await.expect("plan executes");

    assert!(result.overall_success);
    let value = result.final_value.expect("grouped value");
    assert_eq!(value["factorial"], json!(120));
    assert_eq!(value["sqrt"], json!(12));

    let steps: Vec<u32> = result.outcomes.iter().map(|outcome| outcome.step).collect();
    assert_eq!(steps, vec![1, 2], "outcomes stay in step order");
    assert_eq!(math.invocations_of("factorial"), 1);
    assert_eq!(math.invocations_of("sqrt"), 1);
}

#[tokio::test]
async fn sequential_plan_substitutes_prior_results() {
    let math = Arc::new(FakeProvider::new(vec!["subtract", "add"]));
    let engine = support::engine_with(vec![("math", math.clone())]);

    let plan = ExecutionPlan::new(
        Strategy::Sequential,
        vec![
            ToolCall::new(1, "subtract")
                .with_parameter("a", json!(100))
                .with_parameter("b", json!(30))
                .with_result_variable("r1"),
            ToolCall::new(2, "add")
                .with_parameter("a", json!("${r1}"))
                .with_parameter("b", json!(15))
                .with_dependency(Dependency::Single(1)),
        ],
    );

    let result = engine.execute(&plan).await.expect("plan executes");

    assert!(result.overall_success);
    assert_eq!(result.final_value, Some(json!(85)));

    let calls = math.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].tool, "add");
    assert_eq!(calls[1].arguments["a"], json!(70), "reference resolved to the published result");
}

#[tokio::test(start_paused = true)]
async fn hybrid_waits_for_the_whole_layer_before_dependents_start() {
    // Layer 0 finishes at different times; the dependent must not start
    // until both of its producers have terminal outcomes.
    let math = Arc::new(
        FakeProvider::new(vec!["subtract", "factorial", "add"])
            .delayed("subtract", Duration::from_secs(8))
            .delayed("factorial", Duration::from_secs(1)),
    );
    let engine = support::engine_with(vec![("math", math.clone())]);

    let plan = ExecutionPlan::new(
        Strategy::Hybrid,
        vec![
            ToolCall::new(1, "subtract")
                .with_parameter("a", json!(100))
                .with_parameter("b", json!(30))
                .with_result_variable("difference"),
            ToolCall::new(2, "factorial")
                .with_parameter("n", json!(5))
                .with_result_variable("fact"),
            ToolCall::new(3, "add")
                .with_parameter("a", json!("${difference}"))
                .with_parameter("b", json!("${fact}")),
        ],
    );

    let result = engine.execute(&plan).await.expect("plan executes");

    assert!(result.overall_success);
    assert_eq!(result.final_value.expect("grouped value")["add"], json!(190));

    let events = math.events();
    let add_start = events
        .iter()
        .position(|event| event == "start:add")
        .expect("add ran");
    for tool in ["subtract", "factorial"] {
        let end = events
            .iter()
            .position(|event| event == &format!("end:{tool}"))
            .expect("layer 0 call finished");
        assert!(end < add_start, "{tool} must finish before add starts");
    }

    let add_call = math
        .calls()
        .into_iter()
        .find(|call| call.tool == "add")
        .expect("add call recorded");
    assert_eq!(add_call.arguments["a"], json!(70));
    assert_eq!(add_call.arguments["b"], json!(120));
}

#[tokio::test]
async fn tools_resolve_across_several_providers() {
    let math = Arc::new(FakeProvider::new(vec!["add"]));
    let search = Arc::new(FakeProvider::new(vec!["search"]));
    let engine = support::engine_with(vec![("math", math.clone()), ("search", search.clone())]);

    let plan = ExecutionPlan::new(
        Strategy::Parallel,
        vec![
            ToolCall::new(1, "add")
                .with_parameter("a", json!(1))
                .with_parameter("b", json!(2)),
            ToolCall::new(2, "search").with_parameter("query", json!("orrery")),
        ],
    );

    let result = engine.execute(&plan).await.expect("plan executes");

    assert!(result.overall_success);
    assert_eq!(math.invocations_of("add"), 1);
    assert_eq!(search.invocations_of("search"), 1);
}
