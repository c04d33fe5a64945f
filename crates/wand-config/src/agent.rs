use serde::{Deserialize, Serialize};

use crate::Payload;

/// Reference to a registered tool, plus the configuration used to construct it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolConfig {
  /// Registry name, e.g. "data_fetcher"
  pub name: String,

  #[serde(default)]
  pub config: Payload,
}

/// Reference to a registered agent, with its parameters and tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
  /// Registry name, e.g. "echo"
  pub name: String,

  #[serde(default)]
  pub params: Payload,

  #[serde(default)]
  pub tools: Vec<ToolConfig>,
}
