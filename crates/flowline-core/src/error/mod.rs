//! Error Types
//!
//! This module defines the error types shared by every Flowline crate.
//! They are organized into focused submodules:
//! - `tool`: tool lookup and execution errors
//! - `memory`: memory factory and interaction update errors
//! - `definition`: agent definition parsing and validation errors

mod definition;
mod memory;
mod tool;

pub use definition::{DefinitionError, DefinitionResult};
pub use memory::{MemoryError, MemoryResult};
pub use tool::{ToolError, ToolResult};
