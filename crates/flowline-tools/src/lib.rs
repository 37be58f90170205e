//! # Flowline Tools
//!
//! Registry of tool factories keyed by tool type.
//!
//! The runner never holds tool instances across runs. For every step it asks
//! the registry to build a fresh instance from the step's static parameters:
//!
//! ```rust
//! use flowline_tools::{FnToolFactory, InMemoryToolRegistry, ToolRegistry};
//! # use async_trait::async_trait;
//! # use flowline_core::{Parameters, Tool, ToolOutput, ToolResult};
//! # struct EchoTool;
//! # #[async_trait]
//! # impl Tool for EchoTool {
//! #     fn tool_type(&self) -> &str { "echo" }
//! #     async fn run(&self, p: Parameters) -> ToolResult<ToolOutput> {
//! #         Ok(ToolOutput::text(p.get("input").cloned().unwrap_or_default()))
//! #     }
//! # }
//!
//! let registry = InMemoryToolRegistry::new()
//!     .with_factory("echo", FnToolFactory::new(|_: &Parameters| Box::new(EchoTool) as Box<dyn Tool>));
//!
//! assert!(registry.lookup("echo").is_some());
//! assert!(registry.create("missing", &Parameters::new()).is_err());
//! ```

/// Closure-backed tool factories.
pub mod factory;
/// Tool registry implementations.
pub mod registry;

pub use factory::FnToolFactory;
pub use flowline_core::{Parameters, Tool, ToolFactory, ToolOutput};
pub use registry::{InMemoryToolRegistry, ToolRegistry};
