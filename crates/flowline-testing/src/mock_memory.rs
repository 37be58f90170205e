//! # Recording Memory for Testing
//!
//! A conversational memory backend that keeps every interaction update it
//! receives so tests can assert on the exact payload a run produced.

use async_trait::async_trait;
use flowline_core::{
    ConversationMemory, InteractionUpdate, MemoryError, MemoryFactory, MemoryResult,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// One captured `update_interaction` call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedUpdate {
    pub memory_id: String,
    pub interaction_id: String,
    pub update: InteractionUpdate,
}

/// Memory factory whose memories capture every update.
///
/// Clones share captured state.
#[derive(Debug, Clone, Default)]
pub struct RecordingMemoryFactory {
    updates: Arc<Mutex<Vec<RecordedUpdate>>>,
    notify: Arc<Notify>,
    created: Arc<AtomicUsize>,
    failure: Option<String>,
}

impl RecordingMemoryFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every update fail with `reason`. Updates are still captured.
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(reason.into());
        self
    }

    /// Get all captured updates, in arrival order
    pub fn updates(&self) -> Vec<RecordedUpdate> {
        self.updates.lock().unwrap().clone()
    }

    pub fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }

    /// Get the number of memories opened through this factory
    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Wait until at least `count` updates were captured.
    ///
    /// Returns `false` if `timeout` elapses first.
    pub async fn wait_for_updates(&self, count: usize, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let notified = self.notify.notified();
            if self.update_count() >= count {
                return true;
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return self.update_count() >= count;
            }
        }
    }

    fn capture(&self, update: RecordedUpdate) {
        self.updates.lock().unwrap().push(update);
        self.notify.notify_waiters();
    }
}

#[async_trait]
impl MemoryFactory for RecordingMemoryFactory {
    async fn create(&self, memory_id: &str) -> MemoryResult<Arc<dyn ConversationMemory>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(RecordingMemory {
            memory_id: memory_id.to_string(),
            factory: self.clone(),
        }))
    }
}

/// Memory handle created by [`RecordingMemoryFactory`].
#[derive(Debug, Clone)]
pub struct RecordingMemory {
    memory_id: String,
    factory: RecordingMemoryFactory,
}

#[async_trait]
impl ConversationMemory for RecordingMemory {
    fn memory_id(&self) -> &str {
        &self.memory_id
    }

    async fn update_interaction(
        &self,
        interaction_id: &str,
        update: InteractionUpdate,
    ) -> MemoryResult<()> {
        self.factory.capture(RecordedUpdate {
            memory_id: self.memory_id.clone(),
            interaction_id: interaction_id.to_string(),
            update,
        });

        match &self.factory.failure {
            Some(reason) => Err(MemoryError::UpdateFailed {
                interaction_id: interaction_id.to_string(),
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}
