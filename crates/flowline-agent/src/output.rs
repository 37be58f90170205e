//! Output normalization.
//!
//! Tools answer in one of the [`ToolOutput`] shapes. The runner reduces every
//! shape to a single string so it can be stored in the execution context and
//! surfaced to the caller.

use flowline_core::{RecordGroup, ResultRecord, ToolOutput};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One step's normalized result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    /// The step's label.
    pub name: String,
    /// The normalized tool output.
    pub result: String,
}

impl StepResult {
    pub fn new(name: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            result: result.into(),
        }
    }
}

/// Reduce a tool output to a [`StepResult`] named after the step.
pub fn normalize(step_name: &str, output: ToolOutput) -> StepResult {
    let result = match output {
        ToolOutput::Scalar(value) => normalize_scalar(value),
        ToolOutput::Record(record) => normalize_record(&record),
        ToolOutput::Group(group) => normalize_group(&group),
        ToolOutput::Collection(groups) => normalize_collection(groups),
    };
    StepResult::new(step_name, result)
}

fn normalize_scalar(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

// The record's own `result` field is not unwrapped; the whole record is kept.
fn normalize_record(record: &ResultRecord) -> String {
    to_canonical_json(record)
}

fn normalize_group(group: &RecordGroup) -> String {
    to_canonical_json(group)
}

fn normalize_collection(groups: Vec<RecordGroup>) -> String {
    to_canonical_json(&RecordGroup::flatten(groups))
}

fn to_canonical_json<T: Serialize + std::fmt::Debug>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to serialize tool output, using debug form");
        format!("{:?}", value)
    })
}
