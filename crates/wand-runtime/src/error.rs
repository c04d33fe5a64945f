//! Runtime error types.

use thiserror::Error;
use wand_registry::RegistryError;
use wand_workflow::GraphError;

/// Run-level failures. Nothing has executed when one of these is returned.
#[derive(Debug, Error)]
pub enum RuntimeError {
  /// The submitted graph failed validation.
  #[error("graph validation failed: {0}")]
  InvalidGraph(#[from] GraphError),

  /// The orchestrator was configured with unusable settings.
  #[error("invalid configuration: {message}")]
  InvalidConfig { message: String },
}

/// Why a single node attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
  /// The node names an agent that is not registered.
  #[error("unknown agent: {0}")]
  UnknownAgent(String),

  /// The node names a tool that is not registered.
  #[error("unknown tool: {0}")]
  UnknownTool(String),

  /// The attempt did not finish within the node's timeout.
  #[error("node timed out after {timeout_seconds}s")]
  Timeout { timeout_seconds: u64 },

  /// The agent raised instead of returning a result.
  #[error("node runtime error: {message}")]
  Runtime { message: String },
}

impl NodeError {
  /// Whether another attempt could succeed.
  ///
  /// Unknown names are configuration errors and never retried.
  pub fn is_retryable(&self) -> bool {
    matches!(self, Self::Timeout { .. } | Self::Runtime { .. })
  }
}

impl From<RegistryError> for NodeError {
  fn from(err: RegistryError) -> Self {
    match err {
      RegistryError::UnknownAgent(name) => Self::UnknownAgent(name),
      RegistryError::UnknownTool(name) => Self::UnknownTool(name),
    }
  }
}
