use flowline_core::{MemoryError, MemoryFactory, MemoryResult};
use std::collections::HashMap;
use std::sync::Arc;

/// Looks up memory factories by memory type.
pub trait MemoryRegistry: Send + Sync {
    /// Look up the factory registered under `memory_type`.
    fn lookup(&self, memory_type: &str) -> Option<Arc<dyn MemoryFactory>>;

    /// Look up a factory, failing with `MemoryError::UnknownType` when absent.
    fn try_lookup(&self, memory_type: &str) -> MemoryResult<Arc<dyn MemoryFactory>> {
        self.lookup(memory_type)
            .ok_or_else(|| MemoryError::UnknownType {
                memory_type: memory_type.to_string(),
            })
    }
}

/// HashMap-backed memory factory registry.
#[derive(Clone, Default)]
pub struct InMemoryMemoryRegistry {
    factories: HashMap<String, Arc<dyn MemoryFactory>>,
}

impl InMemoryMemoryRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory using the builder pattern.
    pub fn with_factory(
        mut self,
        memory_type: impl Into<String>,
        factory: impl MemoryFactory + 'static,
    ) -> Self {
        self.register(memory_type, Arc::new(factory));
        self
    }

    /// Register a shared factory in place.
    pub fn register(&mut self, memory_type: impl Into<String>, factory: Arc<dyn MemoryFactory>) {
        self.factories.insert(memory_type.into(), factory);
    }

    /// Get all registered memory types, sorted.
    pub fn memory_types(&self) -> Vec<String> {
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

impl MemoryRegistry for InMemoryMemoryRegistry {
    fn lookup(&self, memory_type: &str) -> Option<Arc<dyn MemoryFactory>> {
        self.factories.get(memory_type).cloned()
    }
}

impl std::fmt::Debug for InMemoryMemoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryMemoryRegistry")
            .field("memory_types", &self.memory_types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryConversationStore;

    #[test]
    fn test_try_lookup_unknown_type() {
        let registry = InMemoryMemoryRegistry::new();

        match registry.try_lookup("memoryType") {
            Err(MemoryError::UnknownType { memory_type }) => assert_eq!(memory_type, "memoryType"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected unknown memory type"),
        }
    }

    #[test]
    fn test_register_and_list() {
        let store = InMemoryConversationStore::new();
        let mut registry = InMemoryMemoryRegistry::new().with_factory("b_index", store.clone());
        registry.register("a_index", Arc::new(store));

        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
        assert_eq!(registry.memory_types(), vec!["a_index", "b_index"]);
        assert!(registry.try_lookup("a_index").is_ok());
    }
}
