use serde::{Deserialize, Serialize};

use crate::Payload;
use crate::agent::AgentConfig;

/// Timeout applied to a single attempt when the document does not set one.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 20;

/// Attempt budget applied when the document does not set one.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
  pub id: String,
  pub agent: AgentConfig,

  /// Raw inputs. String values may contain `${node.key}` placeholders.
  #[serde(default)]
  pub inputs: Payload,

  #[serde(default = "default_timeout_seconds")]
  pub timeout_seconds: u64,

  /// Total attempt budget for the node (not "additional" attempts).
  #[serde(default = "default_max_retries")]
  pub max_retries: u32,
}

impl NodeSpec {
  /// Create a node with default inputs, timeout and retry budget.
  pub fn new(id: impl Into<String>, agent: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      agent: AgentConfig {
        name: agent.into(),
        params: Payload::new(),
        tools: Vec::new(),
      },
      inputs: Payload::new(),
      timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
      max_retries: DEFAULT_MAX_RETRIES,
    }
  }

  /// Set a single raw input.
  pub fn with_input(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
    self.inputs.insert(key.into(), value);
    self
  }

  pub fn with_timeout_seconds(mut self, timeout_seconds: u64) -> Self {
    self.timeout_seconds = timeout_seconds;
    self
  }

  pub fn with_max_retries(mut self, max_retries: u32) -> Self {
    self.max_retries = max_retries;
    self
  }
}

fn default_timeout_seconds() -> u64 {
  DEFAULT_TIMEOUT_SECONDS
}

fn default_max_retries() -> u32 {
  DEFAULT_MAX_RETRIES
}
