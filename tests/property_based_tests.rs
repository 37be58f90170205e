//! Property-Based Tests for Parameter Resolution and Outcome Selection
//!
//! These tests use property-based testing to verify the resolver's merge and
//! substitution rules, and the runner's outcome selection, across generated
//! contexts and step lists.

use flowline::agent::{ExecutionContext, resolve_parameters, substitute};
use flowline::memory::InMemoryMemoryRegistry;
use flowline::{AgentDefinition, FlowAgentRunner, Parameters, StepResult, ToolStep};
use flowline_testing::{MockTool, mock_tool_registry};
use proptest::prelude::*;
use std::sync::Arc;

// Strategy for generating parameter keys
fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9_]{1,24}").unwrap()
}

// Strategy for generating values that never contain a placeholder
fn plain_value_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[^$]{0,64}").unwrap()
}

// Strategy for generating step names
fn step_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z][a-zA-Z0-9_-]{0,16}").unwrap()
}

fn context_strategy() -> impl Strategy<Value = Parameters> {
    prop::collection::hash_map(key_strategy(), plain_value_strategy(), 0..16)
}

proptest! {
    /// Property: values without placeholders pass through unchanged
    #[test]
    fn prop_substitution_is_identity_without_placeholders(
        value in plain_value_strategy(),
        source in context_strategy()
    ) {
        prop_assert_eq!(substitute(&value, &source), value.as_str());
    }

    /// Property: a lone placeholder resolves to the referenced value
    #[test]
    fn prop_single_placeholder_resolves(
        key in key_strategy(),
        value in plain_value_strategy()
    ) {
        let source = Parameters::from([(key.clone(), value.clone())]);
        let template = format!("${{parameters.{}}}", key);
        prop_assert_eq!(substitute(&template, &source), value.as_str());
    }

    /// Property: placeholders for missing keys are left as written
    #[test]
    fn prop_missing_placeholder_is_preserved(
        key in key_strategy(),
        source in context_strategy()
    ) {
        prop_assume!(!source.contains_key(&key));
        let template = format!("before ${{parameters.{}}} after", key);
        prop_assert_eq!(substitute(&template, &source), template.as_str());
    }

    /// Property: resolution without templates is context, then static, then overrides
    #[test]
    fn prop_resolution_layers(
        context in context_strategy(),
        statics in context_strategy(),
        name in step_name_strategy()
    ) {
        let mut step = ToolStep::new(name.clone(), "tool");
        step.parameters = statics.clone();
        let resolved = resolve_parameters(&ExecutionContext::new(&context), &step);

        let prefix = format!("{}.", name);
        for (key, value) in &context {
            prop_assert!(resolved.contains_key(key));
            if let Some(suffix) = key.strip_prefix(&prefix) {
                prop_assert_eq!(&resolved[suffix], value);
            }
        }
        for (key, value) in &statics {
            let overridden = context.contains_key(&format!("{}{}", prefix, key));
            if !overridden {
                prop_assert_eq!(&resolved[key], value);
            }
        }
    }

    /// Property: an override wins for its own step and never for another
    #[test]
    fn prop_override_precedence_and_isolation(
        key in key_strategy(),
        static_value in plain_value_strategy(),
        override_value in plain_value_strategy()
    ) {
        let context = ExecutionContext::new(&Parameters::from([(
            format!("target.{}", key),
            override_value.clone(),
        )]));
        let target = ToolStep::new("target", "tool").with_parameter(key.clone(), static_value.clone());
        let other = ToolStep::new("other", "tool").with_parameter(key.clone(), static_value.clone());

        prop_assert_eq!(&resolve_parameters(&context, &target)[&key], &override_value);
        prop_assert_eq!(&resolve_parameters(&context, &other)[&key], &static_value);
    }

    /// Property: resolution is deterministic
    #[test]
    fn prop_resolution_is_deterministic(
        context in context_strategy(),
        name in step_name_strategy()
    ) {
        let context = ExecutionContext::new(&context);
        let step = ToolStep::new(name, "tool");
        prop_assert_eq!(
            resolve_parameters(&context, &step),
            resolve_parameters(&context, &step)
        );
    }

    /// Property: the outcome is the flagged steps in order, or the last step alone
    #[test]
    fn prop_outcome_selection(flags in prop::collection::vec(any::<bool>(), 1..8)) {
        let tools = mock_tool_registry((0..flags.len()).map(|i| {
            MockTool::new(format!("tool{}", i)).with_default_response(format!("out {}", i))
        }));
        let runner = FlowAgentRunner::new(Arc::new(tools), Arc::new(InMemoryMemoryRegistry::new()));
        let agent = AgentDefinition::builder("PropAgent")
            .steps(flags.iter().enumerate().map(|(i, flag)| {
                ToolStep::new(format!("s{}", i), format!("tool{}", i)).include_in_response(*flag)
            }))
            .build();

        let outcome = tokio_test::block_on(runner.run(&agent, &Parameters::new())).unwrap();

        let expected: Vec<StepResult> = if flags.iter().any(|f| *f) {
            flags
                .iter()
                .enumerate()
                .filter(|(_, flag)| **flag)
                .map(|(i, _)| StepResult::new(format!("s{}", i), format!("out {}", i)))
                .collect()
        } else {
            let last = flags.len() - 1;
            vec![StepResult::new(format!("s{}", last), format!("out {}", last))]
        };
        prop_assert_eq!(outcome.into_results(), expected);
    }
}
