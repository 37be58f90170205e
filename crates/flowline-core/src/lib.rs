//! # Flowline Core
//!
//! Core traits and types for the Flowline tool-chain runner.
//! This crate provides the shared vocabulary between the runner, tool
//! registries and memory backends:
//!
//! - **[Tool], [ToolFactory]**: asynchronous tool instances and the factories
//!   that build them from a step's static parameters
//! - **[ToolOutput]**: the closed set of result shapes a tool can hand back
//! - **[ConversationMemory], [MemoryFactory]**: the boundary to the
//!   conversational-history backend
//! - **[AgentDefinition]**: the declarative, ordered list of tool steps

pub mod definition;
pub mod error;
pub mod memory;
pub mod tool;
pub mod validation;

pub use definition::{AgentDefinition, AgentDefinitionBuilder, MemoryConfig, ToolStep};
pub use error::{
    DefinitionError, DefinitionResult, MemoryError, MemoryResult, ToolError, ToolResult,
};
pub use memory::{ConversationMemory, InteractionUpdate, MemoryFactory};
pub use tool::{Parameters, RecordGroup, ResultRecord, Tool, ToolFactory, ToolOutput};
pub use validation::{IdentifierRules, ValidationError};
