//! Runner configuration.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! memory_id_key = "memory_id"
//! parent_interaction_id_key = "parent_interaction_id"
//! additional_info_field = "additional_info"
//! memory_update = "detached"
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{AgentError, AgentResult};

/// How the memory update is sequenced relative to the run's completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryUpdateMode {
    /// Spawn the update on the tokio runtime and return immediately.
    #[default]
    Detached,
    /// Await the update before returning. Failures are still only logged.
    Awaited,
}

/// Configuration for [`FlowAgentRunner`](crate::FlowAgentRunner).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Run parameter holding the memory identifier.
    pub memory_id_key: String,
    /// Run parameter holding the interaction to update.
    pub parent_interaction_id_key: String,
    /// Interaction field the step outputs are nested under.
    pub additional_info_field: String,
    /// Memory update sequencing.
    pub memory_update: MemoryUpdateMode,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            memory_id_key: "memory_id".to_string(),
            parent_interaction_id_key: "parent_interaction_id".to_string(),
            additional_info_field: "additional_info".to_string(),
            memory_update: MemoryUpdateMode::Detached,
        }
    }
}

impl RunnerConfig {
    /// Parse a configuration from TOML, filling unspecified fields with defaults.
    pub fn from_toml_str(input: &str) -> AgentResult<Self> {
        toml::from_str(input).map_err(|e| AgentError::InvalidConfig(e.to_string()))
    }

    pub fn with_memory_id_key(mut self, key: impl Into<String>) -> Self {
        self.memory_id_key = key.into();
        self
    }

    pub fn with_parent_interaction_id_key(mut self, key: impl Into<String>) -> Self {
        self.parent_interaction_id_key = key.into();
        self
    }

    pub fn with_additional_info_field(mut self, field: impl Into<String>) -> Self {
        self.additional_info_field = field.into();
        self
    }

    pub fn with_memory_update(mut self, mode: MemoryUpdateMode) -> Self {
        self.memory_update = mode;
        self
    }
}
