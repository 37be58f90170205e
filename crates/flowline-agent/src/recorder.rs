//! Memory recording.
//!
//! After a successful run the recorder pushes the surfaced step results onto
//! the parent interaction of the run, nested under the configured
//! `additional_info` field:
//!
//! ```json
//! {"additional_info": {"search.output": "3 hits"}}
//! ```
//!
//! Recording never fails the run. Errors are logged and reported back through
//! [`RecordStatus`] for callers that care.

use flowline_core::{InteractionUpdate, MemoryConfig, MemoryResult, Parameters};
use flowline_memory::MemoryRegistry;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, warn};

use crate::config::{MemoryUpdateMode, RunnerConfig};
use crate::output::StepResult;

/// What happened to a recording request.
#[derive(Debug)]
pub enum RecordStatus {
    /// The run parameters carry no parent interaction id or no memory id.
    Skipped,
    /// The update was spawned onto the tokio runtime.
    Detached(JoinHandle<MemoryResult<()>>),
    /// The update ran inline.
    Completed(MemoryResult<()>),
}

impl RecordStatus {
    /// Wait for the update to finish, whatever the mode.
    ///
    /// Returns `None` when recording was skipped or the spawned task panicked.
    pub async fn wait(self) -> Option<MemoryResult<()>> {
        match self {
            RecordStatus::Skipped => None,
            RecordStatus::Completed(result) => Some(result),
            RecordStatus::Detached(handle) => handle.await.ok(),
        }
    }
}

/// Persists step results onto a conversational memory.
#[derive(Clone)]
pub struct MemoryRecorder {
    registry: Arc<dyn MemoryRegistry>,
    config: RunnerConfig,
}

impl MemoryRecorder {
    pub fn new(registry: Arc<dyn MemoryRegistry>, config: RunnerConfig) -> Self {
        Self { registry, config }
    }

    /// Build the update payload for `results`.
    pub fn build_update(&self, results: &[StepResult]) -> InteractionUpdate {
        InteractionUpdate::new().with_entries(
            self.config.additional_info_field.clone(),
            results
                .iter()
                .map(|r| (format!("{}.output", r.name), r.result.clone())),
        )
    }

    /// Record `results` onto the interaction named in `params`.
    pub async fn record(
        &self,
        memory: &MemoryConfig,
        params: &Parameters,
        results: &[StepResult],
    ) -> RecordStatus {
        let Some(interaction_id) = params.get(&self.config.parent_interaction_id_key) else {
            debug!(
                memory_type = %memory.memory_type,
                "No parent interaction id, skipping memory update"
            );
            return RecordStatus::Skipped;
        };

        let Some(memory_id) = params.get(&self.config.memory_id_key) else {
            warn!(
                memory_type = %memory.memory_type,
                interaction_id = %interaction_id,
                key = %self.config.memory_id_key,
                "Parent interaction id present but no memory id, skipping memory update"
            );
            return RecordStatus::Skipped;
        };

        let task = apply_update(
            self.registry.clone(),
            memory.memory_type.clone(),
            memory_id.clone(),
            interaction_id.clone(),
            self.build_update(results),
        );

        match self.config.memory_update {
            MemoryUpdateMode::Detached => match tokio::runtime::Handle::try_current() {
                Ok(handle) => RecordStatus::Detached(handle.spawn(task.in_current_span())),
                Err(_) => {
                    debug!("No tokio runtime available, awaiting memory update inline");
                    RecordStatus::Completed(task.await)
                }
            },
            MemoryUpdateMode::Awaited => RecordStatus::Completed(task.await),
        }
    }
}

impl std::fmt::Debug for MemoryRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryRecorder")
            .field("config", &self.config)
            .finish()
    }
}

async fn apply_update(
    registry: Arc<dyn MemoryRegistry>,
    memory_type: String,
    memory_id: String,
    interaction_id: String,
    update: InteractionUpdate,
) -> MemoryResult<()> {
    let result = async {
        let factory = registry.try_lookup(&memory_type)?;
        let memory = factory.create(&memory_id).await?;
        memory.update_interaction(&interaction_id, update).await
    }
    .await;

    match &result {
        Ok(()) => debug!(
            memory_type = %memory_type,
            memory_id = %memory_id,
            interaction_id = %interaction_id,
            "Updated interaction"
        ),
        Err(e) => warn!(
            memory_type = %memory_type,
            memory_id = %memory_id,
            interaction_id = %interaction_id,
            error = %e,
            "Failed to update interaction"
        ),
    }
    result
}
