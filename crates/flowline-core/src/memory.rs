//! Conversational memory contracts.
//!
//! The runner never talks to storage directly. It asks a [`MemoryFactory`]
//! (looked up by the agent's memory type) to open the memory named in the run
//! parameters, then pushes a single [`InteractionUpdate`] onto the parent
//! interaction of the run.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::error::MemoryResult;

/// Field-level update applied to a stored interaction.
///
/// Top-level fields replace the stored field of the same name; backends may
/// merge object-valued fields (see the in-memory backend).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InteractionUpdate(serde_json::Map<String, Value>);

impl InteractionUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a top-level field, builder style.
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Nest string entries as an object under `field`.
    pub fn with_entries<I, K, V>(self, field: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let nested: serde_json::Map<String, Value> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), Value::String(v.into())))
            .collect();
        self.with_field(field, Value::Object(nested))
    }

    /// Get a top-level field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Iterate over top-level fields.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Check whether the update carries no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert into the underlying JSON object.
    pub fn into_inner(self) -> serde_json::Map<String, Value> {
        self.0
    }
}

/// A conversational-history backend bound to one memory id.
#[async_trait]
pub trait ConversationMemory: Send + Sync {
    /// Identifier of the memory this handle is bound to.
    fn memory_id(&self) -> &str;

    /// Apply `update` to the interaction identified by `interaction_id`.
    async fn update_interaction(
        &self,
        interaction_id: &str,
        update: InteractionUpdate,
    ) -> MemoryResult<()>;
}

/// Opens memory handles by id. Registered under a memory type key.
#[async_trait]
pub trait MemoryFactory: Send + Sync {
    /// Open (or create) the memory identified by `memory_id`.
    async fn create(&self, memory_id: &str) -> MemoryResult<Arc<dyn ConversationMemory>>;
}
