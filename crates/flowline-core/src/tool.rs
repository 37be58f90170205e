//! Tool and tool factory contracts.
//!
//! A [`ToolFactory`] is registered under a string type key and builds a fresh
//! [`Tool`] for every step of every run from that step's static parameters.
//! The tool then runs asynchronously with the fully resolved parameter map and
//! hands back one of the [`ToolOutput`] shapes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ToolResult;

/// Parameter map passed to factories and tools.
pub type Parameters = HashMap<String, String>;

/// An executable tool instance.
///
/// Instances are created per step per run, so implementations may keep
/// per-invocation state without synchronizing against other runs.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use flowline_core::{Parameters, Tool, ToolOutput, ToolResult};
///
/// struct EchoTool;
///
/// #[async_trait]
/// impl Tool for EchoTool {
///     fn tool_type(&self) -> &str {
///         "echo"
///     }
///
///     async fn run(&self, parameters: Parameters) -> ToolResult<ToolOutput> {
///         let input = parameters.get("input").cloned().unwrap_or_default();
///         Ok(ToolOutput::text(input))
///     }
/// }
/// ```
#[async_trait]
pub trait Tool: Send + Sync {
    /// The registry type key this tool was created under.
    fn tool_type(&self) -> &str;

    /// Run the tool with the resolved parameters for its step.
    async fn run(&self, parameters: Parameters) -> ToolResult<ToolOutput>;
}

/// Builds tool instances from a step's static parameters.
pub trait ToolFactory: Send + Sync {
    /// Create a new tool instance.
    fn create(&self, static_parameters: &Parameters) -> Box<dyn Tool>;
}

/// A named result record, the structured unit tools report results in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Name the tool gave this record.
    pub name: String,

    /// Textual result, if the record carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,

    /// Structured payload, if the record carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_as_map: Option<serde_json::Map<String, serde_json::Value>>,
}

impl ResultRecord {
    /// Create an empty record with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            result: None,
            data_as_map: None,
        }
    }

    /// Set the textual result.
    pub fn with_result(mut self, result: impl Into<String>) -> Self {
        self.result = Some(result.into());
        self
    }

    /// Set the structured payload.
    pub fn with_data(mut self, data: serde_json::Map<String, serde_json::Value>) -> Self {
        self.data_as_map = Some(data);
        self
    }
}

/// A flat group of result records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordGroup {
    /// Records in the order the tool produced them.
    #[serde(rename = "output")]
    pub records: Vec<ResultRecord>,
}

impl RecordGroup {
    /// Create a group from records.
    pub fn new(records: Vec<ResultRecord>) -> Self {
        Self { records }
    }

    /// Append a record, builder style.
    pub fn with_record(mut self, record: ResultRecord) -> Self {
        self.records.push(record);
        self
    }

    /// Merge several groups into one, keeping record order.
    pub fn flatten(groups: impl IntoIterator<Item = RecordGroup>) -> Self {
        Self {
            records: groups.into_iter().flat_map(|g| g.records).collect(),
        }
    }
}

/// The closed set of result shapes a tool can return.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// Plain text or any other opaque value.
    Scalar(serde_json::Value),
    /// A single record with its own name/result fields.
    Record(ResultRecord),
    /// A flat group of records.
    Group(RecordGroup),
    /// A collection of record groups.
    Collection(Vec<RecordGroup>),
}

impl ToolOutput {
    /// Plain text output.
    pub fn text(text: impl Into<String>) -> Self {
        ToolOutput::Scalar(serde_json::Value::String(text.into()))
    }

    /// Short name of the shape, used in logs.
    pub fn shape(&self) -> &'static str {
        match self {
            ToolOutput::Scalar(_) => "scalar",
            ToolOutput::Record(_) => "record",
            ToolOutput::Group(_) => "group",
            ToolOutput::Collection(_) => "collection",
        }
    }
}

impl From<String> for ToolOutput {
    fn from(text: String) -> Self {
        ToolOutput::text(text)
    }
}

impl From<&str> for ToolOutput {
    fn from(text: &str) -> Self {
        ToolOutput::text(text)
    }
}

impl From<serde_json::Value> for ToolOutput {
    fn from(value: serde_json::Value) -> Self {
        ToolOutput::Scalar(value)
    }
}

impl From<ResultRecord> for ToolOutput {
    fn from(record: ResultRecord) -> Self {
        ToolOutput::Record(record)
    }
}

impl From<RecordGroup> for ToolOutput {
    fn from(group: RecordGroup) -> Self {
        ToolOutput::Group(group)
    }
}

impl From<Vec<RecordGroup>> for ToolOutput {
    fn from(groups: Vec<RecordGroup>) -> Self {
        ToolOutput::Collection(groups)
    }
}
