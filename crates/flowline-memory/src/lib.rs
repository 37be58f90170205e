//! # Flowline Memory
//!
//! Memory factory registry plus a process-local reference backend.
//!
//! ## Components
//!
//! - **[MemoryRegistry]**: looks up a [`MemoryFactory`] by the agent's memory type
//! - **[InMemoryMemoryRegistry]**: HashMap-backed registry, shared read-only by runs
//! - **[InMemoryConversationStore]**: transient interaction store for development
//!   and tests; everything is lost when the process exits
//!
//! ## Example
//!
//! ```rust
//! use flowline_memory::{InMemoryConversationStore, InMemoryMemoryRegistry, MemoryRegistry};
//!
//! let store = InMemoryConversationStore::new();
//! let registry = InMemoryMemoryRegistry::new().with_factory("conversation_index", store.clone());
//!
//! assert!(registry.lookup("conversation_index").is_some());
//! assert!(registry.lookup("vector").is_none());
//! ```

pub use flowline_core::memory::*;

mod in_memory;
mod registry;

pub use in_memory::{InMemoryConversationMemory, InMemoryConversationStore};
pub use registry::{InMemoryMemoryRegistry, MemoryRegistry};
