//! Declarative agent definitions.
//!
//! An [`AgentDefinition`] is an ordered list of [`ToolStep`]s plus an optional
//! [`MemoryConfig`]. Definitions are plain data: they can be built in code or
//! loaded from JSON/TOML, and are never mutated by a run.
//!
//! ```rust
//! use flowline_core::{AgentDefinition, ToolStep};
//!
//! let agent = AgentDefinition::builder("research")
//!     .step(ToolStep::new("search", "SearchIndexTool").with_parameter("index", "docs"))
//!     .step(ToolStep::new("summarize", "MLModelTool").include_in_response(true))
//!     .memory("conversation_index")
//!     .build();
//!
//! assert_eq!(agent.tools.len(), 2);
//! assert!(agent.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{DefinitionError, DefinitionResult};
use crate::tool::Parameters;
use crate::validation::IdentifierRules;

/// Memory configuration of an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Memory factory registry key.
    #[serde(rename = "type")]
    pub memory_type: String,
}

impl MemoryConfig {
    /// Create a memory configuration for the given factory key.
    pub fn new(memory_type: impl Into<String>) -> Self {
        Self {
            memory_type: memory_type.into(),
        }
    }
}

/// One tool invocation within the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolStep {
    /// Result and context key label. Falls back to the type when empty.
    #[serde(default)]
    pub name: String,

    /// Tool registry key.
    #[serde(rename = "type")]
    pub tool_type: String,

    /// Human readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Step-declared parameter defaults, also handed to the tool factory.
    #[serde(default)]
    pub parameters: Parameters,

    /// Whether this step's result is surfaced in the run outcome.
    #[serde(default, alias = "include_in_response")]
    pub include_output_in_agent_response: bool,
}

impl ToolStep {
    /// Create a step with no static parameters.
    pub fn new(name: impl Into<String>, tool_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tool_type: tool_type.into(),
            description: None,
            parameters: Parameters::new(),
            include_output_in_agent_response: false,
        }
    }

    /// Add a static parameter.
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set whether the step's result is included in the run outcome.
    pub fn include_in_response(mut self, include: bool) -> Self {
        self.include_output_in_agent_response = include;
        self
    }

    /// The label used for results and context keys.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.tool_type
        } else {
            &self.name
        }
    }

    /// Context key holding this step's normalized output.
    pub fn output_key(&self) -> String {
        format!("{}.output", self.label())
    }
}

/// Declarative ordered list of tool steps plus optional memory configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDefinition {
    /// Agent name.
    pub name: String,

    /// Human readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Steps, in execution order.
    #[serde(default)]
    pub tools: Vec<ToolStep>,

    /// Optional memory configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryConfig>,
}

impl AgentDefinition {
    /// Start building a definition.
    pub fn builder(name: impl Into<String>) -> AgentDefinitionBuilder {
        AgentDefinitionBuilder::new(name)
    }

    /// Parse and validate a JSON definition.
    pub fn from_json_str(input: &str) -> DefinitionResult<Self> {
        let definition: Self =
            serde_json::from_str(input).map_err(|e| DefinitionError::Parse {
                format: "json",
                reason: e.to_string(),
            })?;
        definition.validate()?;
        Ok(definition)
    }

    /// Parse and validate a TOML definition.
    pub fn from_toml_str(input: &str) -> DefinitionResult<Self> {
        let definition: Self = toml::from_str(input).map_err(|e| DefinitionError::Parse {
            format: "toml",
            reason: e.to_string(),
        })?;
        definition.validate()?;
        Ok(definition)
    }

    /// Check names and type keys against the identifier rules.
    ///
    /// Applied by the JSON and TOML loaders. The runner itself accepts any
    /// name, so definitions built in code only pass through here on request.
    /// An empty step list is valid here; whether it can run is the runner's call.
    pub fn validate(&self) -> DefinitionResult<()> {
        IdentifierRules::AGENT_NAME
            .validate(&self.name)
            .map_err(|e| DefinitionError::invalid_name("agent", &self.name, e))?;

        for step in &self.tools {
            IdentifierRules::STEP_NAME
                .validate(step.label())
                .map_err(|e| DefinitionError::invalid_name("step", step.label(), e))?;
            IdentifierRules::TYPE_KEY
                .validate(&step.tool_type)
                .map_err(|e| DefinitionError::invalid_name("tool type", &step.tool_type, e))?;
        }

        if let Some(memory) = &self.memory {
            IdentifierRules::TYPE_KEY
                .validate(&memory.memory_type)
                .map_err(|e| {
                    DefinitionError::invalid_name("memory type", &memory.memory_type, e)
                })?;
        }

        Ok(())
    }
}

/// Builder for [`AgentDefinition`].
#[derive(Debug)]
pub struct AgentDefinitionBuilder {
    definition: AgentDefinition,
}

impl AgentDefinitionBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            definition: AgentDefinition {
                name: name.into(),
                description: None,
                tools: Vec::new(),
                memory: None,
            },
        }
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.definition.description = Some(description.into());
        self
    }

    /// Append a step.
    pub fn step(mut self, step: ToolStep) -> Self {
        self.definition.tools.push(step);
        self
    }

    /// Append several steps.
    pub fn steps(mut self, steps: impl IntoIterator<Item = ToolStep>) -> Self {
        self.definition.tools.extend(steps);
        self
    }

    /// Configure memory by factory key.
    pub fn memory(mut self, memory_type: impl Into<String>) -> Self {
        self.definition.memory = Some(MemoryConfig::new(memory_type));
        self
    }

    /// Finish building. Validation is left to the caller or the runner.
    pub fn build(self) -> AgentDefinition {
        self.definition
    }
}
