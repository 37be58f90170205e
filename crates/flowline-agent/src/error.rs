//! Error types for the flow agent runner.

use flowline_core::{DefinitionError, ToolError};
use thiserror::Error;

/// Errors that can fail a run.
///
/// Configuration errors are raised while a definition is loaded or a run is
/// prepared, before any tool executes. Step failures abort the chain at the failing step.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The agent declares no tool steps.
    #[error("no tool configured for agent '{agent}'")]
    NoToolConfigured {
        /// Name of the agent
        agent: String,
    },

    /// A step references a tool type with no registered factory.
    #[error("unknown tool type '{tool_type}' for step '{step}'")]
    UnknownToolType {
        /// Label of the offending step
        step: String,
        /// The unresolved type key
        tool_type: String,
    },

    /// A tool failed while the chain was running.
    #[error("step '{step}' (index {index}) failed: {source}")]
    StepFailed {
        /// Label of the failing step
        step: String,
        /// Zero-based position of the failing step
        index: usize,
        /// Error reported by the tool
        #[source]
        source: ToolError,
    },

    /// A definition loaded from JSON or TOML failed to parse or validate.
    #[error("invalid agent definition: {0}")]
    InvalidDefinition(#[from] DefinitionError),

    /// Runner configuration could not be parsed.
    #[error("invalid runner configuration: {0}")]
    InvalidConfig(String),
}

impl AgentError {
    /// Whether the error was raised before any tool executed.
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, AgentError::StepFailed { .. })
    }

    /// Get the error code suitable for logging or reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            AgentError::NoToolConfigured { .. } => "NO_TOOL_CONFIGURED",
            AgentError::UnknownToolType { .. } => "UNKNOWN_TOOL_TYPE",
            AgentError::StepFailed { .. } => "STEP_FAILED",
            AgentError::InvalidDefinition(_) => "INVALID_DEFINITION",
            AgentError::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }
}

/// Result type for runner operations.
pub type AgentResult<T> = Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = AgentError::NoToolConfigured {
            agent: "TestAgent".to_string(),
        };
        assert_eq!(err.to_string(), "no tool configured for agent 'TestAgent'");

        let err = AgentError::UnknownToolType {
            step: "firstTool".to_string(),
            tool_type: "invalid_tool".to_string(),
        };
        assert!(err.to_string().contains("invalid_tool"));
    }

    #[test]
    fn test_step_failed_keeps_source() {
        let err = AgentError::StepFailed {
            step: "search".to_string(),
            index: 1,
            source: ToolError::execution_failed("SearchIndexTool", "boom"),
        };

        assert!(err.to_string().contains("search"));
        let source = err.source().map(|s| s.to_string()).unwrap_or_default();
        assert!(source.contains("boom"));
    }

    #[test]
    fn test_loader_errors_convert() {
        fn load(input: &str) -> AgentResult<flowline_core::AgentDefinition> {
            Ok(flowline_core::AgentDefinition::from_json_str(input)?)
        }

        let err = load(r#"{"name": "a", "tools": [{"name": "a.b", "type": "t"}]}"#).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_DEFINITION");
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_error_code_and_classification() {
        let config = AgentError::NoToolConfigured {
            agent: "a".to_string(),
        };
        assert_eq!(config.error_code(), "NO_TOOL_CONFIGURED");
        assert!(config.is_configuration_error());

        let failed = AgentError::StepFailed {
            step: "s".to_string(),
            index: 0,
            source: ToolError::execution_failed("t", "x"),
        };
        assert_eq!(failed.error_code(), "STEP_FAILED");
        assert!(!failed.is_configuration_error());
    }
}
