//! # Flowline Testing
//!
//! Test doubles for Flowline agents.
//!
//! ## Components
//!
//! - **[MockTool]**: scripted tool that records every parameter map it receives
//! - **[MockToolFactory]**: factory handing out clones of a [MockTool] that
//!   share its call history
//! - **[RecordingMemoryFactory]**: memory backend that captures interaction updates
//!
//! ## Usage
//!
//! ```rust
//! use flowline_testing::{MockTool, mock_tool_registry};
//! use flowline_tools::ToolRegistry;
//!
//! let search = MockTool::new("search").with_default_response("3 hits");
//! let registry = mock_tool_registry([search.clone()]);
//!
//! assert!(registry.lookup("search").is_some());
//! assert_eq!(search.call_count(), 0);
//! ```

/// Recording memory backend
pub mod mock_memory;
/// Mock tools for predictable testing
pub mod mock_tools;

pub use mock_memory::{RecordedUpdate, RecordingMemory, RecordingMemoryFactory};
pub use mock_tools::{MockTool, MockToolFactory, mock_tool_registry};
