//! # Flowline
//!
//! Sequential tool-chain runner for declarative flow agents.
//!
//! An agent is an ordered list of tool steps. Each step's tool receives a
//! parameter map merged from the run context, its own static parameters and
//! step-prefixed overrides, with `${parameters.KEY}` placeholders filled in.
//! Step outputs are threaded through the context so later steps can refer to
//! `<step>.output`, and the surfaced results can be recorded onto a
//! conversational memory once the run succeeds.
//!
//! This crate re-exports the workspace crates:
//!
//! - [`core`]: tool, memory and definition contracts
//! - [`tools`]: tool factory registry
//! - [`memory`]: memory factory registry and in-memory backend
//! - [`agent`]: the runner

pub mod telemetry;

pub use flowline_agent as agent;
pub use flowline_core as core;
pub use flowline_memory as memory;
pub use flowline_tools as tools;

pub use flowline_agent::{
    AgentError, AgentResult, FlowAgentRunner, FlowPlan, MemoryUpdateMode, RunOutcome,
    RunnerConfig, StepResult,
};
pub use flowline_core::{AgentDefinition, Parameters, Tool, ToolOutput, ToolStep};
