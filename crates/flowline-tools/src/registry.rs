use flowline_core::{
    IdentifierRules, Parameters, Tool, ToolError, ToolFactory, ToolResult, ValidationError,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Trait for looking up tool factories by type and building tool instances.
///
/// Registries are shared read-only between concurrent runs, so implementations
/// must be `Send + Sync` and must not require `&mut self` to serve lookups.
pub trait ToolRegistry: Send + Sync {
    /// Look up the factory registered under `tool_type`.
    ///
    /// # Returns
    ///
    /// `Some(factory)` if the type is registered, `None` otherwise
    fn lookup(&self, tool_type: &str) -> Option<Arc<dyn ToolFactory>>;

    /// Build a fresh tool instance for `tool_type`.
    ///
    /// # Returns
    ///
    /// `Ok(tool)` if the type is registered, `Err(ToolError::UnknownType)` otherwise
    fn create(&self, tool_type: &str, static_parameters: &Parameters) -> ToolResult<Box<dyn Tool>> {
        let factory = self
            .lookup(tool_type)
            .ok_or_else(|| ToolError::unknown_type(tool_type))?;
        Ok(factory.create(static_parameters))
    }
}

/// In-memory registry of tool factories.
///
/// `InMemoryToolRegistry` stores factories in a HashMap keyed by tool type for
/// O(1) lookup. It is populated once at startup and then shared behind an
/// `Arc` by every run.
#[derive(Clone, Default)]
pub struct InMemoryToolRegistry {
    factories: HashMap<String, Arc<dyn ToolFactory>>,
}

impl InMemoryToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a factory using the builder pattern.
    ///
    /// A factory registered under an existing type replaces the previous one.
    pub fn with_factory(
        mut self,
        tool_type: impl Into<String>,
        factory: impl ToolFactory + 'static,
    ) -> Self {
        self.register(tool_type, Arc::new(factory));
        self
    }

    /// Register a factory after validating the type key.
    ///
    /// # Returns
    ///
    /// `Ok(Self)` for method chaining, or `Err(ValidationError)` if the key is invalid
    pub fn try_with_factory(
        mut self,
        tool_type: &str,
        factory: Arc<dyn ToolFactory>,
    ) -> Result<Self, ValidationError> {
        let tool_type = IdentifierRules::TYPE_KEY.validate(tool_type)?;
        self.register(tool_type, factory);
        Ok(self)
    }

    /// Register a shared factory in place.
    pub fn register(&mut self, tool_type: impl Into<String>, factory: Arc<dyn ToolFactory>) {
        let tool_type = tool_type.into();
        if self.factories.insert(tool_type.clone(), factory).is_some() {
            tracing::debug!(tool_type = %tool_type, "Replaced tool factory");
        }
    }

    /// Get all registered tool types, sorted.
    pub fn tool_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.factories.keys().cloned().collect();
        types.sort();
        types
    }

    /// Get the number of registered factories.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl ToolRegistry for InMemoryToolRegistry {
    fn lookup(&self, tool_type: &str) -> Option<Arc<dyn ToolFactory>> {
        self.factories.get(tool_type).cloned()
    }
}

impl std::fmt::Debug for InMemoryToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryToolRegistry")
            .field("tool_types", &self.tool_types())
            .finish()
    }
}
