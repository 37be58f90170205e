//! Parameter resolution.
//!
//! Every step's tool receives a parameter map built from the run's
//! [`ExecutionContext`], in this order:
//!
//! 1. a copy of the context
//! 2. the step's static parameters
//! 3. context entries prefixed `"<step>."`, with the prefix stripped
//! 4. `${parameters.KEY}` placeholders replaced with `KEY` from the context
//!
//! Later layers overwrite earlier ones. Substitution reads the context only,
//! runs once, and leaves placeholders with no matching key untouched.

use flowline_core::{Parameters, ToolStep};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{parameters\.([^}]+)\}").expect("placeholder pattern is valid"));

/// Per-run mutable parameter map.
///
/// Seeded with a copy of the caller's initial parameters and extended with
/// one `"<step>.output"` entry per completed step. The caller's map is never
/// touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    values: Parameters,
}

impl ExecutionContext {
    /// Create a context seeded with a copy of `initial`.
    pub fn new(initial: &Parameters) -> Self {
        Self {
            values: initial.clone(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Store a step's normalized result under `"<step>.output"`.
    pub fn record_output(&mut self, step: &ToolStep, result: impl Into<String>) {
        self.values.insert(step.output_key(), result.into());
    }

    pub fn values(&self) -> &Parameters {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_inner(self) -> Parameters {
        self.values
    }
}

impl From<Parameters> for ExecutionContext {
    fn from(values: Parameters) -> Self {
        Self { values }
    }
}

/// Build the exact parameter map handed to `step`'s tool.
pub fn resolve_parameters(context: &ExecutionContext, step: &ToolStep) -> Parameters {
    let mut resolved = context.values.clone();

    for (key, value) in &step.parameters {
        resolved.insert(key.clone(), value.clone());
    }

    let prefix = format!("{}.", step.label());
    for (key, value) in &context.values {
        if let Some(suffix) = key.strip_prefix(&prefix) {
            resolved.insert(suffix.to_string(), value.clone());
        }
    }

    for value in resolved.values_mut() {
        let substituted = match substitute(value, &context.values) {
            Cow::Owned(substituted) => Some(substituted),
            Cow::Borrowed(_) => None,
        };
        if let Some(substituted) = substituted {
            *value = substituted;
        }
    }

    resolved
}

/// Replace `${parameters.KEY}` occurrences in `template` with values from `source`.
///
/// Unknown keys keep their placeholder text. Returns `Cow::Borrowed` when
/// nothing was replaced.
pub fn substitute<'a>(template: &'a str, source: &Parameters) -> Cow<'a, str> {
    if !template.contains("${parameters.") {
        return Cow::Borrowed(template);
    }

    PLACEHOLDER.replace_all(template, |caps: &Captures<'_>| match source.get(&caps[1]) {
        Some(value) => value.clone(),
        None => caps[0].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn params(pairs: &[(&str, &str)]) -> Parameters {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_context_is_layered_under_static_parameters() {
        let context = ExecutionContext::new(&params(&[("index", "global"), ("question", "q")]));
        let step = ToolStep::new("search", "SearchIndexTool").with_parameter("index", "docs");

        let resolved = resolve_parameters(&context, &step);
        assert_eq!(resolved["index"], "docs");
        assert_eq!(resolved["question"], "q");
    }

    #[test]
    fn test_prefixed_override_wins_over_static() {
        let context = ExecutionContext::new(&params(&[("step1.override", "ov")]));
        let step = ToolStep::new("step1", "tool").with_parameter("override", "static");

        let resolved = resolve_parameters(&context, &step);
        assert_eq!(resolved["override"], "ov");
        // The prefixed key itself is still visible, like any context entry.
        assert_eq!(resolved["step1.override"], "ov");
    }

    #[test]
    fn test_override_does_not_leak_into_other_steps() {
        let context = ExecutionContext::new(&params(&[("step1.k", "only-step1")]));
        let other = ToolStep::new("step2", "tool").with_parameter("k", "static");

        let resolved = resolve_parameters(&context, &other);
        assert_eq!(resolved["k"], "static");
    }

    #[test]
    fn test_override_uses_type_when_name_is_empty() {
        let context = ExecutionContext::new(&params(&[("firstTool.test_param", "test_input_value")]));
        let step = ToolStep::new("", "firstTool");

        let resolved = resolve_parameters(&context, &step);
        assert_eq!(resolved["test_param"], "test_input_value");
    }

    #[test]
    fn test_input_placeholder_is_replaced() {
        let context = ExecutionContext::new(&params(&[
            ("test_param_key", "test_param_value"),
            ("input", "Check if value is replaced: ${parameters.test_param_key}"),
        ]));
        let step = ToolStep::new("firstTool", "firstTool");

        let resolved = resolve_parameters(&context, &step);
        assert_eq!(resolved["test_param_key"], "test_param_value");
        assert_eq!(
            resolved["input"],
            "Check if value is replaced: test_param_value"
        );
    }

    #[test]
    fn test_substitution_reads_context_not_step_map() {
        let context = ExecutionContext::new(&params(&[("k", "from-context")]));
        let step = ToolStep::new("s", "tool")
            .with_parameter("k", "from-static")
            .with_parameter("input", "${parameters.k}");

        let resolved = resolve_parameters(&context, &step);
        assert_eq!(resolved["k"], "from-static");
        assert_eq!(resolved["input"], "from-context");
    }

    #[test]
    fn test_previous_output_is_referenced_through_context() {
        let mut context = ExecutionContext::new(&Parameters::new());
        let first = ToolStep::new("search", "SearchIndexTool");
        context.record_output(&first, "3 hits");

        let second = ToolStep::new("summarize", "MLModelTool")
            .with_parameter("prompt", "Summarize: ${parameters.search.output}");
        let resolved = resolve_parameters(&context, &second);
        assert_eq!(resolved["prompt"], "Summarize: 3 hits");
        assert_eq!(context.get("search.output"), Some("3 hits"));
    }

    #[test]
    fn test_empty_sources_yield_only_overrides() {
        let context = ExecutionContext::new(&Parameters::new());
        let step = ToolStep::new("s", "tool");
        assert!(resolve_parameters(&context, &step).is_empty());
    }

    #[test]
    fn test_caller_map_is_not_mutated() {
        let initial = params(&[("a", "1")]);
        let mut context = ExecutionContext::new(&initial);
        context.insert("b", "2");

        assert_eq!(initial.len(), 1);
        assert_eq!(context.len(), 2);
    }

    #[rstest]
    #[case("plain text", "plain text")]
    #[case("${parameters.K}", "v")]
    #[case("a ${parameters.K} b ${parameters.K}", "a v b v")]
    #[case("${parameters.missing}", "${parameters.missing}")]
    #[case("${parameters.self}", "${parameters.K}")]
    #[case("${parameters.K", "${parameters.K")]
    fn test_substitute(#[case] template: &str, #[case] expected: &str) {
        let source = params(&[("K", "v"), ("self", "${parameters.K}")]);
        assert_eq!(substitute(template, &source), expected);
    }

    #[test]
    fn test_substitute_borrows_when_unchanged() {
        let source = params(&[("K", "v")]);
        assert!(matches!(substitute("no placeholders", &source), Cow::Borrowed(_)));
    }
}
