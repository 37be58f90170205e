//! Tool lookup and execution errors.

use thiserror::Error;

/// Errors that can occur while creating or running a tool.
///
/// Every variant carries the tool type key so a failure can be traced back to
/// the registry entry that produced the tool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// No factory is registered under the requested type key.
    #[error("unknown tool type '{tool_type}'")]
    UnknownType {
        /// The type key that was looked up
        tool_type: String,
    },

    /// The tool ran and reported a failure.
    #[error("tool '{tool_type}' execution failed: {message}")]
    ExecutionFailed {
        /// Type key of the failing tool
        tool_type: String,
        /// Error message reported by the tool
        message: String,
    },

    /// The tool rejected the parameters it was given.
    #[error("tool '{tool_type}' received invalid parameters: {reason}")]
    InvalidParameters {
        /// Type key of the rejecting tool
        tool_type: String,
        /// Why the parameters were rejected
        reason: String,
    },
}

impl ToolError {
    /// Create an UnknownType error for a type key with no registered factory.
    pub fn unknown_type(tool_type: impl Into<String>) -> Self {
        ToolError::UnknownType {
            tool_type: tool_type.into(),
        }
    }

    /// Create an ExecutionFailed error.
    pub fn execution_failed(tool_type: impl Into<String>, message: impl Into<String>) -> Self {
        ToolError::ExecutionFailed {
            tool_type: tool_type.into(),
            message: message.into(),
        }
    }

    /// Create an InvalidParameters error.
    pub fn invalid_parameters(tool_type: impl Into<String>, reason: impl Into<String>) -> Self {
        ToolError::InvalidParameters {
            tool_type: tool_type.into(),
            reason: reason.into(),
        }
    }

    /// Get the tool type key associated with this error.
    pub fn tool_type(&self) -> &str {
        match self {
            ToolError::UnknownType { tool_type }
            | ToolError::ExecutionFailed { tool_type, .. }
            | ToolError::InvalidParameters { tool_type, .. } => tool_type,
        }
    }
}

/// Result type alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;
