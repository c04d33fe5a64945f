//! Wand Config
//!
//! This crate contains the serializable graph document types for wand.
//! These types represent a graph exactly as it is submitted, before it is
//! validated and layered by `wand-workflow`.
//!
//! A graph document looks like:
//!
//! ```json
//! {
//!   "nodes": [
//!     { "id": "a", "agent": { "name": "sum" }, "inputs": { "numbers": [1, 2] } },
//!     { "id": "b", "agent": { "name": "echo" }, "inputs": { "total": "${a.sum}" } }
//!   ],
//!   "edges": [{ "source": "a", "target": "b" }]
//! }
//! ```

mod agent;
mod edge;
mod graph;
mod node;
mod request;

pub use agent::{AgentConfig, ToolConfig};
pub use edge::EdgeSpec;
pub use graph::GraphSpec;
pub use node::{DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECONDS, NodeSpec};
pub use request::{DEFAULT_CONCURRENCY, RunRequest};

/// A string-keyed JSON object.
///
/// Used for agent parameters, tool configuration, node inputs and node results.
pub type Payload = serde_json::Map<String, serde_json::Value>;
