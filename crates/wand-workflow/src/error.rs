use thiserror::Error;

/// Graph validation failures. Any of these aborts a run before execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
  #[error("duplicate node id: {0}")]
  DuplicateNode(String),

  #[error("dangling edge: {from} -> {to} references an unknown node")]
  DanglingEdge { from: String, to: String },

  #[error("cycle detected among nodes: {}", nodes.join(", "))]
  CycleDetected { nodes: Vec<String> },

  #[error("invalid timeout for node '{0}': timeout_seconds must be positive")]
  InvalidTimeout(String),
}
