use async_trait::async_trait;
use flowline_core::{
    ConversationMemory, InteractionUpdate, MemoryError, MemoryFactory, MemoryResult,
};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

type Interaction = Map<String, Value>;
type Interactions = HashMap<String, Interaction>;

/// Fast, transient conversation store.
///
/// `InMemoryConversationStore` keeps interactions per memory id in a
/// HashMap guarded by an `RwLock`. Cloning the store shares the underlying
/// data, so the same store can be registered as a [`MemoryFactory`] and
/// inspected from the outside.
///
/// Updates merge into the stored interaction: object-valued fields are merged
/// key by key, every other field is replaced.
///
/// # Example
///
/// ```rust
/// use flowline_memory::{ConversationMemory, InMemoryConversationStore, InteractionUpdate, MemoryFactory};
///
/// # tokio_test::block_on(async {
/// let store = InMemoryConversationStore::new();
/// let interaction_id = store.start_interaction("memory-1", InteractionUpdate::new()).unwrap();
///
/// let memory = store.create("memory-1").await.unwrap();
/// memory
///     .update_interaction(
///         &interaction_id,
///         InteractionUpdate::new().with_entries("additional_info", [("search.output", "3 hits")]),
///     )
///     .await
///     .unwrap();
///
/// let stored = store.interaction("memory-1", &interaction_id).unwrap();
/// assert_eq!(stored["additional_info"]["search.output"], "3 hits");
/// # });
/// ```
#[derive(Clone, Default)]
pub struct InMemoryConversationStore {
    memories: Arc<RwLock<HashMap<String, Interactions>>>,
}

impl InMemoryConversationStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new interaction under `memory_id` and return its generated id.
    pub fn start_interaction(
        &self,
        memory_id: &str,
        fields: InteractionUpdate,
    ) -> MemoryResult<String> {
        let interaction_id = uuid::Uuid::new_v4().to_string();
        let mut memories = self
            .memories
            .write()
            .map_err(|e| MemoryError::LockPoisoned(e.to_string()))?;
        memories
            .entry(memory_id.to_string())
            .or_default()
            .insert(interaction_id.clone(), fields.into_inner());
        Ok(interaction_id)
    }

    /// Snapshot of a stored interaction.
    pub fn interaction(&self, memory_id: &str, interaction_id: &str) -> Option<Interaction> {
        let memories = self.memories.read().ok()?;
        memories.get(memory_id)?.get(interaction_id).cloned()
    }

    /// Number of interactions stored under `memory_id`.
    pub fn interaction_count(&self, memory_id: &str) -> usize {
        self.memories
            .read()
            .map(|m| m.get(memory_id).map_or(0, HashMap::len))
            .unwrap_or(0)
    }

    fn apply(
        &self,
        memory_id: &str,
        interaction_id: &str,
        update: InteractionUpdate,
    ) -> MemoryResult<()> {
        let mut memories = self
            .memories
            .write()
            .map_err(|e| MemoryError::LockPoisoned(e.to_string()))?;

        let interaction = memories
            .get_mut(memory_id)
            .and_then(|interactions| interactions.get_mut(interaction_id))
            .ok_or_else(|| MemoryError::UpdateFailed {
                interaction_id: interaction_id.to_string(),
                reason: format!("interaction not found in memory '{}'", memory_id),
            })?;

        for (field, value) in update.into_inner() {
            match (interaction.get_mut(&field), value) {
                (Some(Value::Object(existing)), Value::Object(incoming)) => {
                    existing.extend(incoming);
                }
                (_, value) => {
                    interaction.insert(field, value);
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl MemoryFactory for InMemoryConversationStore {
    async fn create(&self, memory_id: &str) -> MemoryResult<Arc<dyn ConversationMemory>> {
        if memory_id.trim().is_empty() {
            return Err(MemoryError::CreateFailed {
                memory_id: memory_id.to_string(),
                reason: "memory id cannot be empty".to_string(),
            });
        }

        Ok(Arc::new(InMemoryConversationMemory {
            memory_id: memory_id.to_string(),
            store: self.clone(),
        }))
    }
}

impl std::fmt::Debug for InMemoryConversationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let memories = self.memories.read().map(|m| m.len()).unwrap_or(0);
        f.debug_struct("InMemoryConversationStore")
            .field("memories", &memories)
            .finish()
    }
}

/// Handle onto one memory id of an [`InMemoryConversationStore`].
#[derive(Debug, Clone)]
pub struct InMemoryConversationMemory {
    memory_id: String,
    store: InMemoryConversationStore,
}

#[async_trait]
impl ConversationMemory for InMemoryConversationMemory {
    fn memory_id(&self) -> &str {
        &self.memory_id
    }

    async fn update_interaction(
        &self,
        interaction_id: &str,
        update: InteractionUpdate,
    ) -> MemoryResult<()> {
        self.store.apply(&self.memory_id, interaction_id, update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_update_merges_object_fields() {
        let store = InMemoryConversationStore::new();
        let id = store
            .start_interaction(
                "memory-1",
                InteractionUpdate::new()
                    .with_field("input", "question")
                    .with_entries("additional_info", [("a.output", "1")]),
            )
            .unwrap();

        let memory = store.create("memory-1").await.unwrap();
        memory
            .update_interaction(
                &id,
                InteractionUpdate::new()
                    .with_field("response", "answer")
                    .with_entries("additional_info", [("b.output", "2")]),
            )
            .await
            .unwrap();

        let stored = Value::Object(store.interaction("memory-1", &id).unwrap());
        assert_eq!(
            stored,
            json!({
                "input": "question",
                "response": "answer",
                "additional_info": {"a.output": "1", "b.output": "2"}
            })
        );
    }

    #[tokio::test]
    async fn test_update_unknown_interaction_fails() {
        let store = InMemoryConversationStore::new();
        let memory = store.create("memory-1").await.unwrap();

        let err = memory
            .update_interaction("missing", InteractionUpdate::new())
            .await
            .unwrap_err();
        assert!(matches!(err, MemoryError::UpdateFailed { .. }));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_memory_id() {
        let store = InMemoryConversationStore::new();
        let err = store.create("  ").await.err().unwrap();
        assert!(matches!(err, MemoryError::CreateFailed { .. }));
    }

    #[tokio::test]
    async fn test_memories_are_isolated_by_id() {
        let store = InMemoryConversationStore::new();
        let id = store
            .start_interaction("memory-1", InteractionUpdate::new())
            .unwrap();

        let other = store.create("memory-2").await.unwrap();
        assert_eq!(other.memory_id(), "memory-2");
        assert!(
            other
                .update_interaction(&id, InteractionUpdate::new())
                .await
                .is_err()
        );
        assert_eq!(store.interaction_count("memory-1"), 1);
        assert_eq!(store.interaction_count("memory-2"), 0);
    }
}
