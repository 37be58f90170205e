//! Concurrency Tests for Shared Registries
//!
//! Many runs share one runner and its registries. Each run owns its context
//! and tool instances, so results never bleed between runs.

use flowline::memory::InMemoryMemoryRegistry;
use flowline::{
    AgentDefinition, FlowAgentRunner, MemoryUpdateMode, Parameters, RunnerConfig, ToolStep,
};
use flowline_testing::{MockTool, RecordingMemoryFactory, mock_tool_registry};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;

fn shared_runner(memory: RecordingMemoryFactory) -> FlowAgentRunner {
    let tools = mock_tool_registry([
        MockTool::new("slow").with_default_response("slow").with_delay(Duration::from_millis(5)),
        MockTool::new("echo"),
    ]);
    let memories = InMemoryMemoryRegistry::new().with_factory("memoryType", memory);
    FlowAgentRunner::new(Arc::new(tools), Arc::new(memories))
        .with_config(RunnerConfig::default().with_memory_update(MemoryUpdateMode::Awaited))
}

fn agent() -> AgentDefinition {
    AgentDefinition::builder("ConcurrentAgent")
        .step(ToolStep::new("first", "slow"))
        .step(
            ToolStep::new("second", "echo")
                .with_parameter("input", "${parameters.request}")
                .include_in_response(true),
        )
        .memory("memoryType")
        .build()
}

fn run_params(i: usize) -> Parameters {
    Parameters::from([
        ("request".to_string(), format!("request-{}", i)),
        ("memory_id".to_string(), format!("memory-{}", i)),
        ("parent_interaction_id".to_string(), format!("interaction-{}", i)),
    ])
}

/// Interleaved runs keep their own parameters
#[tokio::test]
async fn test_concurrent_runs_are_isolated() {
    let memory = RecordingMemoryFactory::new();
    let runner = shared_runner(memory.clone());
    let agent = agent();

    let runs = (0..32).map(|i| {
        let runner = runner.clone();
        let agent = agent.clone();
        async move { (i, runner.run(&agent, &run_params(i)).await) }
    });

    for (i, outcome) in join_all(runs).await {
        let outcome = outcome.unwrap();
        assert_eq!(outcome.len(), 1);
        assert_eq!(outcome.results()[0].result, format!("Mock response for: request-{}", i));
    }

    let updates = memory.updates();
    assert_eq!(updates.len(), 32);
    for update in updates {
        let i = update.memory_id.trim_start_matches("memory-");
        assert_eq!(update.interaction_id, format!("interaction-{}", i));
    }
}

/// Runs spawned on the multi-threaded runtime
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_runs_across_worker_threads() {
    let runner = Arc::new(shared_runner(RecordingMemoryFactory::new()));
    let agent = Arc::new(agent());

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let runner = runner.clone();
            let agent = agent.clone();
            tokio::spawn(async move { runner.run(&agent, &run_params(i)).await })
        })
        .collect();

    let mut run_ids = Vec::new();
    for handle in handles {
        let outcome = handle.await.unwrap().unwrap();
        run_ids.push(outcome.run_id());
    }
    run_ids.sort();
    run_ids.dedup();
    assert_eq!(run_ids.len(), 16);
}
