//! Step chain orchestration.
//!
//! A run goes through these states:
//!
//! ```text
//! Validating -> Running(0) -> .. -> Running(n-1) -> Finalizing -> Completed
//!     |              |
//!     +--------------+-------------------------------------------> Failed
//! ```
//!
//! Every transition is logged at trace level with a `state` field.
//!
//! Validation happens in [`FlowAgentRunner::prepare`], which is synchronous
//! and builds every step's tool before anything executes. The returned
//! [`FlowPlan`] then runs the steps one after another, awaiting each tool
//! before resolving the next step's parameters.

use flowline_core::{AgentDefinition, Parameters, Tool, ToolStep};
use flowline_memory::MemoryRegistry;
use flowline_tools::ToolRegistry;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, debug, info, info_span, trace, warn};
use uuid::Uuid;

use crate::config::RunnerConfig;
use crate::error::{AgentError, AgentResult};
use crate::output::{StepResult, normalize};
use crate::params::{ExecutionContext, resolve_parameters};
use crate::recorder::MemoryRecorder;

/// Lifecycle state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Validating,
    Running(usize),
    Finalizing,
    Completed,
    Failed,
}

impl RunState {
    /// Whether the run can make no further progress.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Completed | RunState::Failed)
    }
}

fn transition(state: RunState) {
    trace!(state = %state, "Run state changed");
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunState::Validating => write!(f, "validating"),
            RunState::Running(index) => write!(f, "running({})", index),
            RunState::Finalizing => write!(f, "finalizing"),
            RunState::Completed => write!(f, "completed"),
            RunState::Failed => write!(f, "failed"),
        }
    }
}

/// The results a successful run surfaces to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    run_id: Uuid,
    results: Vec<StepResult>,
}

impl RunOutcome {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Surfaced results, in step order.
    pub fn results(&self) -> &[StepResult] {
        &self.results
    }

    /// Look up a surfaced result by step name.
    pub fn get(&self, step: &str) -> Option<&StepResult> {
        self.results.iter().find(|r| r.name == step)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn into_results(self) -> Vec<StepResult> {
        self.results
    }
}

struct PreparedStep {
    step: ToolStep,
    tool: Box<dyn Tool>,
}

/// A validated agent with one freshly built tool per step.
///
/// Plans are single use: [`execute`](FlowPlan::execute) consumes the plan so
/// tool instances never outlive the run they were built for.
pub struct FlowPlan {
    agent: AgentDefinition,
    steps: Vec<PreparedStep>,
    recorder: MemoryRecorder,
}

impl FlowPlan {
    pub fn agent(&self) -> &AgentDefinition {
        &self.agent
    }

    /// Number of steps the plan will run.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step in order, then record the outcome to memory if configured.
    ///
    /// The first failing step aborts the run; later steps are never invoked
    /// and no partial outcome is returned.
    pub async fn execute(self, params: &Parameters) -> AgentResult<RunOutcome> {
        let run_id = Uuid::new_v4();
        let span = info_span!("flow_run", agent = %self.agent.name, run_id = %run_id);
        self.execute_inner(run_id, params).instrument(span).await
    }

    async fn execute_inner(self, run_id: Uuid, params: &Parameters) -> AgentResult<RunOutcome> {
        let started = Instant::now();
        let last = self.steps.len().saturating_sub(1);
        let mut context = ExecutionContext::new(params);
        let mut results: Vec<StepResult> = Vec::new();

        info!(steps = self.steps.len(), "Starting flow run");

        for (index, PreparedStep { step, tool }) in self.steps.iter().enumerate() {
            transition(RunState::Running(index));

            let parameters = resolve_parameters(&context, step);
            debug!(
                step = %step.label(),
                index,
                tool_type = %step.tool_type,
                parameters = parameters.len(),
                "Running step"
            );

            let step_started = Instant::now();
            let output = match tool.run(parameters).await {
                Ok(output) => output,
                Err(source) => {
                    transition(RunState::Failed);
                    warn!(
                        step = %step.label(),
                        index,
                        tool_type = %step.tool_type,
                        error = %source,
                        "Step failed, aborting run"
                    );
                    return Err(AgentError::StepFailed {
                        step: step.label().to_string(),
                        index,
                        source,
                    });
                }
            };

            debug!(
                step = %step.label(),
                index,
                shape = output.shape(),
                elapsed_ms = step_started.elapsed().as_millis() as u64,
                "Step completed"
            );

            let result = normalize(step.label(), output);
            context.record_output(step, result.result.clone());

            if step.include_output_in_agent_response || (index == last && results.is_empty()) {
                results.push(result);
            }
        }

        transition(RunState::Finalizing);
        if let Some(memory) = &self.agent.memory {
            self.recorder
                .record(memory, context.values(), &results)
                .await;
        }

        transition(RunState::Completed);
        info!(
            results = results.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Flow run completed"
        );

        Ok(RunOutcome { run_id, results })
    }
}

impl std::fmt::Debug for FlowPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowPlan")
            .field("agent", &self.agent.name)
            .field(
                "steps",
                &self.steps.iter().map(|s| s.step.label()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Runs flow agents against shared tool and memory registries.
///
/// The runner holds no per-run state and can serve any number of concurrent
/// runs.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use flowline_agent::FlowAgentRunner;
/// use flowline_core::{AgentDefinition, Parameters, Tool, ToolOutput, ToolResult, ToolStep};
/// use flowline_memory::InMemoryMemoryRegistry;
/// use flowline_tools::{FnToolFactory, InMemoryToolRegistry};
/// use std::sync::Arc;
///
/// struct Shout;
///
/// #[async_trait]
/// impl Tool for Shout {
///     fn tool_type(&self) -> &str {
///         "shout"
///     }
///
///     async fn run(&self, parameters: Parameters) -> ToolResult<ToolOutput> {
///         Ok(ToolOutput::text(parameters["input"].to_uppercase()))
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let tools = InMemoryToolRegistry::new()
///     .with_factory("shout", FnToolFactory::new(|_: &Parameters| Box::new(Shout) as Box<dyn Tool>));
/// let runner = FlowAgentRunner::new(Arc::new(tools), Arc::new(InMemoryMemoryRegistry::new()));
///
/// let agent = AgentDefinition::builder("greeter")
///     .step(ToolStep::new("greet", "shout"))
///     .build();
/// let params = Parameters::from([("input".to_string(), "hello".to_string())]);
///
/// let outcome = runner.run(&agent, &params).await.unwrap();
/// assert_eq!(outcome.results()[0].result, "HELLO");
/// # });
/// ```
#[derive(Clone)]
pub struct FlowAgentRunner {
    tools: Arc<dyn ToolRegistry>,
    memories: Arc<dyn MemoryRegistry>,
    config: RunnerConfig,
    recorder: MemoryRecorder,
}

impl FlowAgentRunner {
    pub fn new(tools: Arc<dyn ToolRegistry>, memories: Arc<dyn MemoryRegistry>) -> Self {
        let config = RunnerConfig::default();
        Self {
            recorder: MemoryRecorder::new(memories.clone(), config.clone()),
            tools,
            memories,
            config,
        }
    }

    /// Replace the runner configuration.
    pub fn with_config(mut self, config: RunnerConfig) -> Self {
        self.recorder = MemoryRecorder::new(self.memories.clone(), config.clone());
        self.config = config;
        self
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Check `agent` and build one tool per step.
    ///
    /// Fails without executing anything when the agent has no steps or a
    /// step's tool type is not registered. Names and type keys are taken as
    /// given; any key the tool registry resolves can run.
    pub fn prepare(&self, agent: &AgentDefinition) -> AgentResult<FlowPlan> {
        let span = info_span!("flow_prepare", agent = %agent.name);
        let _guard = span.enter();
        transition(RunState::Validating);

        if agent.tools.is_empty() {
            transition(RunState::Failed);
            warn!("No tool configured");
            return Err(AgentError::NoToolConfigured {
                agent: agent.name.clone(),
            });
        }

        let steps = agent
            .tools
            .iter()
            .map(|step| {
                let tool = self
                    .tools
                    .create(&step.tool_type, &step.parameters)
                    .map_err(|e| {
                        transition(RunState::Failed);
                        warn!(
                            step = %step.label(),
                            tool_type = %step.tool_type,
                            "Unknown tool type"
                        );
                        AgentError::UnknownToolType {
                            step: step.label().to_string(),
                            tool_type: e.tool_type().to_string(),
                        }
                    })?;
                Ok(PreparedStep {
                    step: step.clone(),
                    tool,
                })
            })
            .collect::<AgentResult<Vec<_>>>()?;

        Ok(FlowPlan {
            agent: agent.clone(),
            steps,
            recorder: self.recorder.clone(),
        })
    }

    /// Prepare and execute `agent` with `params` as the initial context.
    pub async fn run(&self, agent: &AgentDefinition, params: &Parameters) -> AgentResult<RunOutcome> {
        self.prepare(agent)?.execute(params).await
    }
}

impl std::fmt::Debug for FlowAgentRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowAgentRunner")
            .field("config", &self.config)
            .finish()
    }
}
