//! Memory factory and interaction update errors.

use thiserror::Error;

/// Errors that can occur while resolving a memory backend or updating an
/// interaction through it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// No memory factory is registered under the requested type key.
    #[error("unknown memory type '{memory_type}'")]
    UnknownType {
        /// The type key that was looked up
        memory_type: String,
    },

    /// The factory could not open the memory identified by `memory_id`.
    #[error("Failed to create memory '{memory_id}': {reason}")]
    CreateFailed {
        /// Identifier of the memory that was requested
        memory_id: String,
        /// Why creation failed
        reason: String,
    },

    /// The backend refused or failed an interaction update.
    #[error("Failed to update interaction '{interaction_id}': {reason}")]
    UpdateFailed {
        /// Identifier of the interaction being updated
        interaction_id: String,
        /// Why the update failed
        reason: String,
    },

    /// A lock guarding backend state was poisoned.
    #[error("Memory lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Result type alias for memory operations.
pub type MemoryResult<T> = Result<T, MemoryError>;
