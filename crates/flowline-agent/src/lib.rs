//! # Flowline Agent
//!
//! The sequential flow agent runner. A run takes an [`AgentDefinition`] and an
//! initial parameter map, executes each tool step in order while threading
//! outputs through a per-run [`ExecutionContext`], and returns the surfaced
//! [`StepResult`]s.
//!
//! ## Modules
//!
//! - [`params`]: parameter merging and `${parameters.KEY}` substitution
//! - [`output`]: normalization of tool outputs into step results
//! - [`chain`]: the runner, its prepared plans and run outcomes
//! - [`recorder`]: post-run interaction updates on conversational memory
//! - [`config`]: runner configuration
//!
//! [`AgentDefinition`]: flowline_core::AgentDefinition

pub mod chain;
pub mod config;
pub mod error;
pub mod output;
pub mod params;
pub mod recorder;

pub use chain::{FlowAgentRunner, FlowPlan, RunOutcome, RunState};
pub use config::{MemoryUpdateMode, RunnerConfig};
pub use error::{AgentError, AgentResult};
pub use output::{StepResult, normalize};
pub use params::{ExecutionContext, resolve_parameters, substitute};
pub use recorder::{MemoryRecorder, RecordStatus};
