//! # Mock Tools for Testing
//!
//! This module provides mock tool implementations that return predictable responses,
//! allowing for reliable and controlled agent testing scenarios.

use async_trait::async_trait;
use flowline_core::{Parameters, Tool, ToolError, ToolFactory, ToolOutput, ToolResult};
use flowline_tools::InMemoryToolRegistry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
enum MockResponse {
    Output(ToolOutput),
    Failure(String),
}

/// A mock tool that returns predefined responses based on its `input` parameter.
///
/// Clones share call tracking, so a clone handed to a registry can be
/// inspected through the original.
#[derive(Debug, Clone)]
pub struct MockTool {
    tool_type: String,
    responses: HashMap<String, MockResponse>,
    default_response: Option<MockResponse>,
    delay: Option<Duration>,
    call_history: Arc<Mutex<Vec<Parameters>>>,
}

impl MockTool {
    /// Create a new mock tool with the given type key
    pub fn new(tool_type: impl Into<String>) -> Self {
        Self {
            tool_type: tool_type.into(),
            responses: HashMap::new(),
            default_response: None,
            delay: None,
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a text response for a specific `input` value
    pub fn with_response(mut self, input: impl Into<String>, response: impl Into<String>) -> Self {
        self.responses.insert(
            input.into(),
            MockResponse::Output(ToolOutput::text(response)),
        );
        self
    }

    /// Add a failure response for a specific `input` value
    pub fn with_failure(mut self, input: impl Into<String>, error: impl Into<String>) -> Self {
        self.responses
            .insert(input.into(), MockResponse::Failure(error.into()));
        self
    }

    /// Set a default text response for any unmatched input
    pub fn with_default_response(mut self, response: impl Into<String>) -> Self {
        self.default_response = Some(MockResponse::Output(ToolOutput::text(response)));
        self
    }

    /// Set a default structured output for any unmatched input
    pub fn with_default_output(mut self, output: impl Into<ToolOutput>) -> Self {
        self.default_response = Some(MockResponse::Output(output.into()));
        self
    }

    /// Set a default failure response for any unmatched input
    pub fn with_default_failure(mut self, error: impl Into<String>) -> Self {
        self.default_response = Some(MockResponse::Failure(error.into()));
        self
    }

    /// Sleep before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get the type key this tool is registered under
    pub fn tool_type(&self) -> &str {
        &self.tool_type
    }

    /// Get the number of times this tool has been called
    pub fn call_count(&self) -> usize {
        self.call_history.lock().unwrap().len()
    }

    /// Get the parameter maps passed to this tool, in call order
    pub fn call_history(&self) -> Vec<Parameters> {
        self.call_history.lock().unwrap().clone()
    }

    /// Get the parameters of the most recent call
    pub fn last_call(&self) -> Option<Parameters> {
        self.call_history.lock().unwrap().last().cloned()
    }

    /// Reset call history
    pub fn reset(&self) {
        self.call_history.lock().unwrap().clear();
    }

    /// Check if any call received `key` set to `value`
    pub fn was_called_with(&self, key: &str, value: &str) -> bool {
        self.call_history
            .lock()
            .unwrap()
            .iter()
            .any(|params| params.get(key).map(String::as_str) == Some(value))
    }

    fn respond(&self, parameters: &Parameters) -> ToolResult<ToolOutput> {
        let input = parameters.get("input").map(String::as_str).unwrap_or("");
        let response = self
            .responses
            .get(input)
            .or(self.default_response.as_ref());

        match response {
            Some(MockResponse::Output(output)) => Ok(output.clone()),
            Some(MockResponse::Failure(error)) => {
                Err(ToolError::execution_failed(&self.tool_type, error.clone()))
            }
            None => Ok(ToolOutput::text(format!("Mock response for: {}", input))),
        }
    }
}

#[async_trait]
impl Tool for MockTool {
    fn tool_type(&self) -> &str {
        &self.tool_type
    }

    async fn run(&self, parameters: Parameters) -> ToolResult<ToolOutput> {
        self.call_history.lock().unwrap().push(parameters.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.respond(&parameters)
    }
}

/// Factory handing out clones of a [`MockTool`].
///
/// Records the static parameters of every instance it builds.
#[derive(Debug, Clone)]
pub struct MockToolFactory {
    tool: MockTool,
    created: Arc<AtomicUsize>,
    static_parameters: Arc<Mutex<Vec<Parameters>>>,
}

impl MockToolFactory {
    pub fn new(tool: MockTool) -> Self {
        Self {
            tool,
            created: Arc::new(AtomicUsize::new(0)),
            static_parameters: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get the template tool, sharing call history with every created instance
    pub fn tool(&self) -> &MockTool {
        &self.tool
    }

    /// Get the number of instances created so far
    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Get the static parameters each instance was created with
    pub fn static_parameters(&self) -> Vec<Parameters> {
        self.static_parameters.lock().unwrap().clone()
    }
}

impl ToolFactory for MockToolFactory {
    fn create(&self, static_parameters: &Parameters) -> Box<dyn Tool> {
        self.created.fetch_add(1, Ordering::SeqCst);
        self.static_parameters
            .lock()
            .unwrap()
            .push(static_parameters.clone());
        Box::new(self.tool.clone())
    }
}

/// Build a registry with one [`MockToolFactory`] per tool, keyed by tool type
pub fn mock_tool_registry(tools: impl IntoIterator<Item = MockTool>) -> InMemoryToolRegistry {
    tools.into_iter().fold(InMemoryToolRegistry::new(), |registry, tool| {
        let tool_type = tool.tool_type().to_string();
        registry.with_factory(tool_type, MockToolFactory::new(tool))
    })
}
