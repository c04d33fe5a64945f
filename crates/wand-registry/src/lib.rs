//! Wand Registry
//!
//! Maps agent and tool names, as they appear in a graph document, to the
//! factories that construct them. The registry is built once, up front, and
//! shared read-only by every run.
//!
//! ```ignore
//! let mut registry = Registry::builtin();
//! registry.register_agent("shout", |ctx| Box::new(ShoutAgent::new(ctx)));
//! ```

mod error;
mod registry;

pub use error::RegistryError;
pub use registry::{AgentFactory, Registry, ToolFactory};
